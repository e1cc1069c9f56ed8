//! JSON-lines output for a query session

use futures_util::StreamExt;
use std::io::Write;

use crate::catalog::CatalogClient;
use crate::error::OutputError;
use crate::execution::QuerySession;

/// Drain `session` into `out`, one JSON record per line.
///
/// Returns the number of records written. A failing session stops the
/// output after the records already written.
pub async fn write_json_lines<C, W>(
    session: &mut QuerySession<C>,
    out: &mut W,
) -> Result<usize, OutputError>
where
    C: CatalogClient,
    W: Write,
{
    let records = session.stream();
    futures_util::pin_mut!(records);

    let mut written = 0;
    while let Some(record) = records.next().await {
        serde_json::to_writer(&mut *out, &record?)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
