use std::io;

use super::resource::AdminResource;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] io::Error),
}

/// Write rows as CSV with the resource's header line. Returns the row count.
pub fn export_csv<R, W>(rows: &[&R], writer: W) -> Result<usize, ExportError>
where
    R: AdminResource,
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(R::CSV_HEADERS)?;
    for row in rows {
        writer.write_record(row.csv_row())?;
    }
    writer.flush()?;
    Ok(rows.len())
}
