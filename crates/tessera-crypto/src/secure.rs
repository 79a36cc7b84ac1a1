//! Sensitive-buffer hygiene.
//!
//! Multi-pass clearing, constant-time comparison and a scoped helper that
//! guarantees clearing on every exit path, including unwinding.

use crate::random::SecureRng;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Default number of clearing passes.
pub const DEFAULT_CLEAR_PASSES: usize = 3;

/// Overwrite a buffer with [`DEFAULT_CLEAR_PASSES`] passes, ending cleared.
pub fn clear(buf: &mut [u8]) {
    clear_with_passes(buf, DEFAULT_CLEAR_PASSES);
}

/// Overwrite a buffer `passes` times, cycling random bytes, 0xFF and 0x00,
/// then zeroize. Best-effort: a CSPRNG failure degrades that pass to a
/// zero fill and is not reported.
pub fn clear_with_passes(buf: &mut [u8], passes: usize) {
    let mut rng = SecureRng::new();
    for pass in 0..passes.max(1) {
        match pass % 3 {
            0 => {
                if rng.fill(buf).is_err() {
                    buf.fill(0);
                }
            }
            1 => buf.fill(0xFF),
            _ => buf.fill(0),
        }
    }
    // Unconditional final zero pass; also a compiler-fence against the
    // earlier writes being elided.
    buf.zeroize();
}

/// Constant-time byte-slice equality.
///
/// Slices of different lengths compare unequal; equal-length comparison is
/// branchless on the data.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Run `f` over a sensitive buffer, clearing the buffer on every exit path:
/// normal return, early `?` return inside `f`, and unwinding.
pub fn with_sensitive<T>(buf: Vec<u8>, f: impl FnOnce(&mut [u8]) -> T) -> T {
    struct Guard(Vec<u8>);

    impl Drop for Guard {
        fn drop(&mut self) {
            clear(&mut self.0);
        }
    }

    let mut guard = Guard(buf);
    f(&mut guard.0)
}
