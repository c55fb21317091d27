//! Sobol low-discrepancy sequence (Gray-code construction, 32-bit).
//!
//! Direction numbers are the Joe–Kuo `new-joe-kuo-6.21201` set for the first
//! dimensions. Dimension 1 is the van der Corput sequence in base 2.

use crate::error::SamplingConfigError;

const BITS: usize = 32;

/// `(degree s, coefficient a, initial m_1..m_s)` for dimensions 2 and up
const DIRECTION_NUMBERS: &[(u32, u32, &[u32])] = &[
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
    (7, 7, &[1, 1, 3, 13, 7, 35, 63]),
    (7, 8, &[1, 3, 5, 9, 1, 25, 53]),
];

/// Highest dimension with tabulated direction numbers
pub const MAX_DIMENSIONS: usize = DIRECTION_NUMBERS.len() + 1;

/// Unscrambled Sobol point generator
#[derive(Debug, Clone)]
pub struct SobolSequence {
    directions: Vec<[u32; BITS]>,
    state: Vec<u32>,
    index: u64,
}

impl SobolSequence {
    pub fn new(dimensions: usize) -> Result<Self, SamplingConfigError> {
        if dimensions > MAX_DIMENSIONS {
            return Err(SamplingConfigError::TooManyDimensions {
                requested: dimensions,
                supported: MAX_DIMENSIONS,
            });
        }

        let mut directions = Vec::with_capacity(dimensions);
        if dimensions > 0 {
            let mut first = [0u32; BITS];
            for (k, v) in first.iter_mut().enumerate() {
                *v = 1 << (BITS - 1 - k);
            }
            directions.push(first);
        }
        for &(degree, coeff, initial) in DIRECTION_NUMBERS.iter().take(dimensions.saturating_sub(1)) {
            directions.push(direction_vector(degree as usize, coeff, initial));
        }

        Ok(Self {
            directions,
            state: vec![0; dimensions],
            index: 0,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.directions.len()
    }

    /// Write the next point into `out`, which must hold `dimensions()` values
    pub fn next_into(&mut self, out: &mut [f64]) {
        for (o, &x) in out.iter_mut().zip(&self.state) {
            *o = f64::from(x) / 4_294_967_296.0;
        }
        // Gray code: flip the direction bit at the lowest zero bit of the index
        let bit = (!self.index).trailing_zeros() as usize;
        if bit < BITS {
            for (x, dir) in self.state.iter_mut().zip(&self.directions) {
                *x ^= dir[bit];
            }
        }
        self.index += 1;
    }

    pub fn next_point(&mut self) -> Vec<f64> {
        let mut point = vec![0.0; self.dimensions()];
        self.next_into(&mut point);
        point
    }

    /// Advance past `n` points
    pub fn skip(&mut self, n: u64) {
        let mut scratch = vec![0.0; self.dimensions()];
        for _ in 0..n {
            self.next_into(&mut scratch);
        }
    }
}

fn direction_vector(degree: usize, coeff: u32, initial: &[u32]) -> [u32; BITS] {
    let mut v = [0u32; BITS];
    for k in 0..BITS {
        if k < degree {
            v[k] = initial[k] << (BITS - 1 - k);
        } else {
            let mut value = v[k - degree] ^ (v[k - degree] >> degree);
            for i in 1..degree {
                if (coeff >> (degree - 1 - i)) & 1 == 1 {
                    value ^= v[k - i];
                }
            }
            v[k] = value;
        }
    }
    v
}
