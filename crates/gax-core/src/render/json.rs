//! Raw JSON passthrough of the extracted report.

use std::io::Write;

use serde::Serialize;

use crate::render::RenderError;

/// Serializes `value` unchanged.
///
/// Used for a [`DayReport`](crate::report::DayReport) or a flat row list.
pub fn write_json<T, W>(value: &T, writer: &mut W) -> Result<(), RenderError>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    serde_json::to_writer(&mut *writer, value)?;
    writer.flush()?;
    Ok(())
}
