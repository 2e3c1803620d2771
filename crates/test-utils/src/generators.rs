//! Test data generators for synthetic wafer results.
//!
//! Matrices are indexed `[row offset][col offset]`, the layout layers read.
//! Dies outside the inscribed circle are `-1` so the generated maps look
//! like real round wafers.

/// Whether die `(row, col)` of a `rows x cols` grid has its center inside
/// the inscribed circle.
pub fn in_circle(rows: usize, cols: usize, row: usize, col: usize) -> bool {
    let cy = rows as f64 / 2.0;
    let cx = cols as f64 / 2.0;
    let dy = (row as f64 + 0.5 - cy) / cy;
    let dx = (col as f64 + 0.5 - cx) / cx;
    dx * dx + dy * dy <= 1.0
}

/// Pass/fail matrix on a round wafer.
///
/// Dies inside the circle pass (`0`) except every `fail_every`-th die in
/// row-major order, which fails (`1`). A `fail_every` of 0 passes them all.
///
/// # Example
///
/// ```
/// use test_utils::create_result_matrix;
///
/// let results = create_result_matrix(5, 5, 3);
/// assert_eq!(results.len(), 5);
/// assert_eq!(results[0][0], -1); // corner is off the wafer
/// assert_eq!(results[2][2], 1);  // die 12 is a multiple of 3
/// ```
pub fn create_result_matrix(rows: usize, cols: usize, fail_every: usize) -> Vec<Vec<i32>> {
    generate(rows, cols, |row, col| {
        let index = row * cols + col;
        if fail_every > 0 && index % fail_every == 0 {
            1
        } else {
            0
        }
    })
}

/// Bin-code matrix on a round wafer, codes cycling through `1..=bins`
/// along the diagonals.
pub fn create_bin_matrix(rows: usize, cols: usize, bins: i32) -> Vec<Vec<i32>> {
    let bins = bins.max(1);
    generate(rows, cols, |row, col| 1 + (row + col) as i32 % bins)
}

/// Same code for every die on the round wafer.
pub fn create_uniform_matrix(rows: usize, cols: usize, code: i32) -> Vec<Vec<i32>> {
    generate(rows, cols, |_, _| code)
}

/// Payload matrix matching `results`: `{"bin": code}` for failing dies,
/// `null` everywhere else.
pub fn create_payloads(results: &[Vec<i32>]) -> Vec<Vec<serde_json::Value>> {
    results
        .iter()
        .map(|row| {
            row.iter()
                .map(|&code| {
                    if code > 0 {
                        serde_json::json!({ "bin": code })
                    } else {
                        serde_json::Value::Null
                    }
                })
                .collect()
        })
        .collect()
}

/// Number of dies in `matrix` with a known (non-negative) code.
pub fn known_dies(matrix: &[Vec<i32>]) -> usize {
    matrix.iter().flatten().filter(|&&code| code >= 0).count()
}

fn generate(rows: usize, cols: usize, code: impl Fn(usize, usize) -> i32) -> Vec<Vec<i32>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    if in_circle(rows, cols, row, col) {
                        code(row, col)
                    } else {
                        -1
                    }
                })
                .collect()
        })
        .collect()
}
