use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use triage_core::AuditRecord;

/// Append one row to the audit CSV, writing the header for a new file.
pub fn append(path: &Path, record: &AuditRecord) -> Result<()> {
    let fresh = match fs::metadata(path) {
        Ok(m) => m.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;

    let mut w = csv::WriterBuilder::new().has_headers(fresh).from_writer(file);
    w.serialize(record).context("write audit row")?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: &str, count: usize) -> AuditRecord {
        AuditRecord {
            timestamp: "2024-05-30T09:00:00+00:00".into(),
            mode: "heuristic".into(),
            provider: String::new(),
            model: String::new(),
            prefer_deadline: true,
            prefer_high_priority: false,
            order: order.into(),
            count,
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("audit.csv");

        append(&p, &record("2 1", 2)).unwrap();
        append(&p, &record("1 2 3", 3)).unwrap();

        let s = fs::read_to_string(&p).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,mode,provider,model,prefer_deadline,prefer_high_priority,order,count"
        );
        assert_eq!(lines[2], "2024-05-30T09:00:00+00:00,heuristic,,,true,false,1 2 3,3");
    }
}
