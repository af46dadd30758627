use std::fs::File;
use std::path::Path;

use csv::Writer;
use sim_config::ReportFlags;

use crate::error::ReportError;
use crate::rows::{AttackLogRow, BlockLogRow, ErrorLogRow, EventLogRow, StructureLogRow};

/// Owns one CSV writer per enabled reporter. Writers for disabled
/// reporters are simply absent, so `log_*` calls on a disabled reporter
/// are a cheap no-op rather than a buffered-then-discarded write.
pub struct Reporters {
    events: Option<Writer<File>>,
    blocks: Option<Writer<File>>,
    structure: Option<Writer<File>>,
    attacks: Option<Writer<File>>,
    errors: Option<Writer<File>>,
}

impl Reporters {
    pub fn open(output_dir: impl AsRef<Path>, flags: ReportFlags) -> Result<Reporters, ReportError> {
        let dir = output_dir.as_ref();
        Ok(Reporters {
            events: open_if(dir, "events.csv", flags.events)?,
            blocks: open_if(dir, "blocks.csv", flags.block_events)?,
            structure: open_if(dir, "structure.csv", flags.structure_events)?,
            attacks: open_if(dir, "attacks.csv", flags.attack_events)?,
            errors: open_if(dir, "errors.csv", true)?,
        })
    }

    pub fn log_event(&mut self, row: EventLogRow) -> Result<(), ReportError> {
        write_row(&mut self.events, "event", row)
    }

    pub fn log_block(&mut self, row: BlockLogRow) -> Result<(), ReportError> {
        write_row(&mut self.blocks, "block", row)
    }

    pub fn log_structure(&mut self, row: StructureLogRow) -> Result<(), ReportError> {
        write_row(&mut self.structure, "structure", row)
    }

    pub fn log_attack(&mut self, row: AttackLogRow) -> Result<(), ReportError> {
        write_row(&mut self.attacks, "attack", row)
    }

    pub fn log_error(&mut self, row: ErrorLogRow) -> Result<(), ReportError> {
        write_row(&mut self.errors, "error", row)
    }

    pub fn flush_all(&mut self) -> Result<(), ReportError> {
        for (kind, writer) in [
            ("event", &mut self.events),
            ("block", &mut self.blocks),
            ("structure", &mut self.structure),
            ("attack", &mut self.attacks),
            ("error", &mut self.errors),
        ] {
            if let Some(writer) = writer {
                writer.flush().map_err(|source| ReportError::Flush { kind, source })?;
            }
        }
        Ok(())
    }
}

fn open_if(dir: &Path, filename: &str, enabled: bool) -> Result<Option<Writer<File>>, ReportError> {
    if !enabled {
        return Ok(None);
    }
    let path = dir.join(filename);
    let writer = Writer::from_path(&path).map_err(|source| ReportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(writer))
}

fn write_row<R: serde::Serialize>(
    writer: &mut Option<Writer<File>>,
    kind: &'static str,
    row: R,
) -> Result<(), ReportError> {
    if let Some(writer) = writer {
        writer.serialize(row).map_err(|source| ReportError::Write { kind, source })?;
    }
    Ok(())
}
