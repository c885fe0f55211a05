use northwind_core::AppError;

/// Maps a sqlx failure onto the application error taxonomy.
///
/// Unique violations become duplicate-key failures and foreign-key
/// violations become field validation failures; connection-level problems
/// surface as the store being unavailable.
pub(crate) fn map_store_error(context: &str, error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) => match db_error.code().as_deref() {
            Some("23505") => AppError::DuplicateKey(format!(
                "{context}: {}",
                db_error
                    .constraint()
                    .unwrap_or("unique constraint violated")
            )),
            Some("23503") => AppError::invalid_field(
                db_error.constraint().unwrap_or("reference"),
                "referenced row does not exist",
            ),
            _ => AppError::Internal(format!("{context}: {error}")),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => AppError::StoreUnavailable(format!("{context}: {error}")),
        _ => AppError::Internal(format!("{context}: {error}")),
    }
}
