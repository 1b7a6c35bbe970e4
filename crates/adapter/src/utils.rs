//! Crate internal helpers.

/// Returns early with `$error` unless `$predicate` holds.
///
/// ```ignore
/// ensure!(bytes.len() == 16, CodecError::invalid_base64("md5 digest must be 16 bytes"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
