use std::io::Write;

use crate::phi::DecodeResult;

use super::ExportError;

/// Write decoded spectra as a single table.
///
/// Each region contributes a row holding only its name, then one `x,y` row
/// per sample. Regions are written in declaration order; regions that were
/// not decoded are left out.
pub fn write_spectra_csv<W: Write>(
    writer: W,
    result: &DecodeResult,
    delimiter: u8,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    for region in &result.spectra {
        csv_writer.write_record([region.name()])?;
        for (x, y) in region.spectrum.samples() {
            csv_writer.write_record([x.to_string(), y.to_string()])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
