/// Logs a failed result and wraps it into an `AppError`
///
/// # Example
/// ```ignore
/// with_context!(conn.query(sql).await, "Failed to list raffle entries")
/// with_context!(connect(url).await, ServerError, "Failed to reach database")
/// ```
#[macro_export]
macro_rules! with_context {
    ($result:expr, $context:expr) => {
        $result.map_err(|e| {
            tracing::error!("{}: {}", $context, e);
            $crate::AppError::DatabaseError(anyhow::anyhow!("{}: {}", $context, e))
        })
    };

    ($result:expr, $error_type:ident, $context:expr) => {
        $result.map_err(|e| {
            tracing::error!("{}: {}", $context, e);
            $crate::AppError::$error_type(anyhow::anyhow!("{}: {}", $context, e))
        })
    };
}

/// Simplifies creating validation errors
///
/// # Example
/// ```ignore
/// validation_error!("numbers", "Select at least one number")
/// ```
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        Err($crate::AppError::ValidationError(format!(
            "Validation failed for '{}': {}",
            $field, $message
        )))
    };
}
