use std::io::{self, BufRead, Write};

use crate::protocol::{ControlRequest, ControlResponse};
use crate::surface::ControlSurface;

/// Answer newline-delimited JSON requests from `reader` until EOF.
///
/// One response line per non-blank request line. A line that is not a valid
/// request gets an error response; only I/O failures end the loop early.
pub fn serve<R: BufRead, W: Write>(
    surface: &ControlSurface,
    mut reader: R,
    mut writer: W,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ControlRequest>(line) {
            Ok(request) => surface.handle(request),
            Err(err) => {
                tracing::warn!(error = %err, "rejected malformed request");
                ControlResponse::error(format!("invalid request: {err}"))
            }
        };

        let payload = serde_json::to_string(&response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tracing::debug!("request stream closed");
    Ok(())
}
