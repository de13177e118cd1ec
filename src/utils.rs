use std::fmt::Formatter;

/// Write an error followed by every `source()` beneath it, one per line. Used
/// in `Debug` impls so that logs carry the whole chain rather than only the
/// outermost message.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
