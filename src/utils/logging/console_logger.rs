use console::style;
use log::*;

/// Announces one stage of a multi-stage training run for a column.
pub(crate) struct StageLogger<'a> {
    step: usize,
    of: usize,
    stage: &'a str,
    column: usize,
}

impl<'a> StageLogger<'a> {
    pub fn new(step: usize, of: usize, stage: &'a str, column: usize) -> Self {
        Self {
            step,
            of,
            stage,
            column,
        }
    }

    fn format_step(&self) -> String {
        format!("[{}/{}]", self.step, self.of)
    }

    pub fn started(&self) {
        info!(
            "{} Training {} on column {}...",
            style(self.format_step()).bold().dim(),
            self.stage,
            self.column
        );
    }

    pub fn finished(&self) {
        debug!(
            "{} {} on column {} finished",
            style(self.format_step()).dim(),
            self.stage,
            self.column
        );
    }
}
