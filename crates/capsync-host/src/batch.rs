//! Converting every capsule collider in a scene.

use std::fmt;
use std::ops::Range;

use capsync_convert::{CapsuleParams, System};
use capsync_scene::Scene;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::accessor::CenterAccessor;
use crate::adapter::{HostAdapter, Placement};
use crate::error::HostError;

/// Options for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// System to convert into.
    pub target: System,
    /// What to do with the source colliders.
    #[serde(default)]
    pub placement: Placement,
}

/// Per-object result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    /// Colliders were converted.
    Converted {
        /// Number of converted colliders.
        count: usize,
    },
    /// The object was left alone.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
    /// Conversion was attempted and failed.
    Failed {
        /// What went wrong.
        error: HostError,
    },
}

/// One line of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Object name.
    pub object: String,
    /// What happened to it.
    pub status: EntryStatus,
}

/// Outcome of [`BatchConverter::convert_scene`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Objects whose colliders were converted.
    pub converted: usize,
    /// Objects left alone.
    pub skipped: usize,
    /// Objects that failed.
    pub failed: usize,
    /// Per-object results in scene order. Objects without any capsule are omitted.
    pub entries: Vec<ReportEntry>,
}

impl BatchReport {
    fn push(&mut self, object: String, status: EntryStatus) {
        match status {
            EntryStatus::Converted { .. } => self.converted += 1,
            EntryStatus::Skipped { .. } => self.skipped += 1,
            EntryStatus::Failed { .. } => self.failed += 1,
        }
        self.entries.push(ReportEntry { object, status });
    }

    /// Whether no object failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "converted {}, skipped {}, failed {}",
            self.converted, self.skipped, self.failed
        )
    }
}

/// Converts every object of a scene, with a choice of placement.
#[derive(Debug, Clone)]
pub struct BatchConverter<C> {
    adapter: HostAdapter<C>,
    options: BatchOptions,
}

/// Object whose sources occupy `range` of the flattened record list.
struct Pending {
    index: usize,
    range: Range<usize>,
}

impl<C: CenterAccessor> BatchConverter<C> {
    /// Create a batch converter.
    pub fn new(adapter: HostAdapter<C>, options: BatchOptions) -> Self {
        Self { adapter, options }
    }

    /// The batch options.
    pub fn options(&self) -> BatchOptions {
        self.options
    }

    /// Convert every object in `scene`.
    ///
    /// Objects carrying both systems are skipped with a warning. A failure
    /// on one object never stops the rest. Collider reads and writes run in
    /// scene order; the geometry itself is converted in parallel.
    pub fn convert_scene(&self, scene: &mut Scene) -> BatchReport {
        let target = self.options.target;
        let source = target.other();

        let mut statuses: Vec<Option<EntryStatus>> = vec![None; scene.objects.len()];
        let mut records: Vec<CapsuleParams> = Vec::new();
        let mut pending: Vec<Pending> = Vec::new();

        for (index, object) in scene.objects.iter().enumerate() {
            match self.adapter.plan(object, target) {
                Ok(true) => match self.adapter.read_sources(object, source) {
                    Ok(found) => {
                        let start = records.len();
                        records.extend(found);
                        pending.push(Pending {
                            index,
                            range: start..records.len(),
                        });
                    }
                    Err(error) => {
                        warn!("{error}");
                        statuses[index] = Some(EntryStatus::Failed { error });
                    }
                },
                Ok(false) => {
                    debug!("{}: already System {}", object.name, target);
                    statuses[index] = Some(EntryStatus::Skipped {
                        reason: format!("already System {target}"),
                    });
                }
                Err(error @ HostError::Ambiguous { .. }) => {
                    warn!("{error}, skipping");
                    statuses[index] = Some(EntryStatus::Skipped {
                        reason: "both systems present".to_string(),
                    });
                }
                Err(HostError::MissingCollider { .. }) => {}
                Err(error) => {
                    warn!("{error}");
                    statuses[index] = Some(EntryStatus::Failed { error });
                }
            }
        }

        let results = self.adapter.converter().convert_all(&records);

        for Pending { index, range } in pending {
            let object = &mut scene.objects[index];
            let converted: Result<Vec<CapsuleParams>, HostError> = results[range]
                .iter()
                .cloned()
                .map(|r| {
                    r.map_err(|source| HostError::Convert {
                        object: object.name.clone(),
                        source,
                    })
                })
                .collect();

            let status = match converted.and_then(|c| {
                self.adapter
                    .write_converted(object, &c, self.options.placement)
                    .map(|()| c.len())
            }) {
                Ok(count) => EntryStatus::Converted { count },
                Err(error) => {
                    warn!("{error}");
                    EntryStatus::Failed { error }
                }
            };
            statuses[index] = Some(status);
        }

        let mut report = BatchReport::default();
        for (object, status) in scene.objects.iter().zip(statuses) {
            if let Some(status) = status {
                report.push(object.name.clone(), status);
            }
        }
        info!("batch to System {target}: {report}");
        report
    }
}
