use crate::application::dispatch::Payload;
use crate::error::{LedgerError, Result};
use std::io::Write;

/// Writes one `function,status,payload` row per processed invocation.
///
/// `status` is `ok` on success or the error tag, in which case `payload` holds
/// the error message.
pub struct ResponseWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(["function", "status", "payload"])?;
        Ok(Self { writer })
    }

    pub fn write_response(&mut self, function: &str, response: &Result<Payload>) -> Result<()> {
        match response {
            Ok(payload) => {
                let rendered = payload.render()?;
                self.writer.write_record([function, "ok", rendered.as_str()])?;
            }
            Err(e) => self.write_error(function, e)?,
        }
        Ok(())
    }

    pub fn write_error(&mut self, function: &str, error: &LedgerError) -> Result<()> {
        self.writer
            .write_record([function, error.tag(), error.to_string().as_str()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
