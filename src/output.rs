use std::io::{self, Write};

/// User-facing output. Every line goes to stdout and, when present, to an
/// extra writer so callers can capture what was printed.
pub struct Output<'a> {
    extra: Option<&'a mut dyn Write>,
}

impl<'a> Output<'a> {
    pub fn new(extra: Option<&'a mut dyn Write>) -> Self {
        Output { extra }
    }

    pub fn println(&mut self, message: &str) -> io::Result<()> {
        if let Err(e) = writeln!(io::stdout(), "{message}") {
            tracing::warn!(error = %e, "failed to write to stdout");
        }

        if let Some(w) = self.extra.as_mut() {
            writeln!(w, "{message}")?;
        }

        Ok(())
    }
}
