//! Reed-Solomon error correction over GF(256).
//!
//! QR codes use RS with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D)
//! and generator roots alpha^0 .. alpha^(t-1).

use crate::error::DecodeError;

/// GF(256) field operations backed by log/exp tables
pub struct Gf256;

static LOG_TABLE: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static EXP_TABLE: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

impl Gf256 {
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    pub fn div(a: u8, b: u8) -> u8 {
        debug_assert!(b != 0, "GF(256) division by zero");
        if a == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        let diff = if log_a >= log_b {
            log_a - log_b
        } else {
            log_a + 255 - log_b
        };
        EXP_TABLE[diff]
    }

    pub fn pow(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }
}

/// Reed-Solomon decoder for one block of codewords
pub struct ReedSolomonDecoder {
    ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(ecc_codewords: usize) -> Self {
        Self { ecc_codewords }
    }

    /// Correct errors in `received` in place.
    ///
    /// Fails with `ChecksumFailed` when the block has more errors than the
    /// code can repair.
    pub fn correct(&self, received: &mut [u8]) -> Result<(), DecodeError> {
        let syndrome = self.syndromes(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(());
        }

        let sigma = self.error_locator(&syndrome);
        let positions = self.error_positions(&sigma, received.len())?;
        let values = self.error_values(&sigma, &syndrome, &positions, received.len())?;

        for (&pos, &value) in positions.iter().zip(values.iter()) {
            received[pos] ^= value;
        }

        // The correction must leave a valid codeword behind.
        if self.syndromes(received).iter().any(|&s| s != 0) {
            return Err(DecodeError::ChecksumFailed);
        }
        Ok(())
    }

    /// Syndromes S_i = r(alpha^i) with r in descending-power convention
    fn syndromes(&self, received: &[u8]) -> Vec<u8> {
        let n = received.len();
        let mut syndrome = vec![0u8; self.ecc_codewords];
        for (i, s) in syndrome.iter_mut().enumerate() {
            let mut sum = 0u8;
            for (j, &c) in received.iter().enumerate() {
                sum ^= Gf256::mul(c, Gf256::pow(2, i * (n - 1 - j)));
            }
            *s = sum;
        }
        syndrome
    }

    /// Berlekamp-Massey: error locator polynomial sigma from the syndromes
    fn error_locator(&self, syndrome: &[u8]) -> Vec<u8> {
        let n = syndrome.len();
        let mut sigma = vec![1u8];
        let mut b = vec![1u8];
        let mut delta_b: u8 = 1;
        let mut l = 0;
        let mut m = 1;

        for i in 0..n {
            let mut delta = syndrome[i];
            for j in 1..=l {
                if j < sigma.len() && i >= j {
                    delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
                }
            }

            if delta == 0 {
                m += 1;
            } else if 2 * l <= i {
                let sigma_prev = sigma.clone();
                let d = Gf256::div(delta, delta_b);
                while sigma.len() < b.len() + m {
                    sigma.push(0);
                }
                for j in 0..b.len() {
                    let term = Gf256::mul(d, b[j]);
                    if j + m < sigma.len() {
                        sigma[j + m] ^= term;
                    }
                }
                b = sigma_prev;
                delta_b = delta;
                l = i + 1 - l;
                m = 1;
            } else {
                let d = Gf256::div(delta, delta_b);
                while sigma.len() < b.len() + m {
                    sigma.push(0);
                }
                for j in 0..b.len() {
                    let term = Gf256::mul(d, b[j]);
                    if j + m < sigma.len() {
                        sigma[j + m] ^= term;
                    }
                }
                m += 1;
            }
        }

        sigma
    }

    /// Chien search: positions where sigma evaluates to zero
    fn error_positions(&self, sigma: &[u8], n: usize) -> Result<Vec<usize>, DecodeError> {
        let mut positions = Vec::new();

        // Roots lie at X_k^{-1} where X_k = alpha^(n-1-pos)
        for i in 0..n {
            let exp = (n - 1 - i) % 255;
            let x_inv = if exp == 0 { 1 } else { Gf256::pow(2, 255 - exp) };

            let mut sum = 0u8;
            for (j, &coeff) in sigma.iter().enumerate() {
                sum ^= Gf256::mul(coeff, Gf256::pow(x_inv, j));
            }
            if sum == 0 {
                positions.push(i);
            }
        }

        if positions.len() != sigma.len() - 1 {
            return Err(DecodeError::ChecksumFailed);
        }
        Ok(positions)
    }

    /// Forney algorithm: error magnitudes at the located positions
    fn error_values(
        &self,
        sigma: &[u8],
        syndrome: &[u8],
        positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>, DecodeError> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for i in 0..syndrome.len() {
            for j in 0..=i {
                if j < sigma.len() {
                    omega[i] ^= Gf256::mul(sigma[j], syndrome[i - j]);
                }
            }
        }

        let mut values = Vec::with_capacity(positions.len());
        for &pos in positions {
            let exp = (n - 1 - pos) % 255;
            let x_inv = if exp == 0 { 1 } else { Gf256::pow(2, 255 - exp) };

            let mut omega_val = 0u8;
            for (i, &coeff) in omega.iter().enumerate() {
                omega_val ^= Gf256::mul(coeff, Gf256::pow(x_inv, i));
            }

            // Formal derivative of sigma: odd-power terms only
            let mut sigma_prime_val = 0u8;
            for (i, &coeff) in sigma.iter().enumerate().skip(1) {
                if i % 2 == 1 {
                    sigma_prime_val ^= Gf256::mul(coeff, Gf256::pow(x_inv, i - 1));
                }
            }
            if sigma_prime_val == 0 {
                return Err(DecodeError::ChecksumFailed);
            }

            let x_k = Gf256::pow(2, exp);
            values.push(Gf256::mul(x_k, Gf256::div(omega_val, sigma_prime_val)));
        }

        Ok(values)
    }
}
