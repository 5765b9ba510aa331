use std::{
    io::Write,
    sync::Mutex,
};

use crate::{
    format::{Pair, Record},
    sink::{Scope, Severity, Sink},
    Error,
};

/**
A sink that writes one line of plain text per event.

Lines look like `<severity> <subsystem>/<category>: <message> k1=v1 k2=v2`,
which mirrors how a native log facility renders a record with annotations.
*/
pub struct Text<W> {
    out: Mutex<W>,
}

impl<W> Text<W>
where
    W: Write + Send,
{
    pub fn new(out: W) -> Self {
        Text {
            out: Mutex::new(out),
        }
    }

    /**
    Take back the underlying writer.
    */
    pub fn into_inner(self) -> Result<W, Error> {
        self.out
            .into_inner()
            .map_err(|_| anyhow!("the text writer is poisoned"))
    }

    fn write(
        &self,
        scope: &Scope,
        severity: Severity,
        message: &str,
        pairs: &[Pair],
    ) -> Result<(), Error> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow!("the text writer is poisoned"))?;

        write!(out, "{} {}/{}: {}", severity, scope.subsystem, scope.category, message)?;

        for pair in pairs {
            write!(out, " {}={}", pair.key, pair.value)?;
        }

        writeln!(out)?;
        out.flush()?;

        Ok(())
    }
}

impl<W> Sink for Text<W>
where
    W: Write + Send,
{
    fn emit(&self, scope: &Scope, severity: Severity, message: &str) -> Result<(), Error> {
        self.write(scope, severity, message, &[])
    }

    fn emit_structured(&self, scope: &Scope, record: &Record) -> Result<(), Error> {
        self.write(scope, record.severity, record.message, &record.pairs)
    }
}
