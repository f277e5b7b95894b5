use std::io::{self, Write};

use ui::{MemorySurface, Region, RenderSurface};

/// Line-oriented surface: keeps region state and prints a frame when it changes.
#[derive(Debug)]
pub struct TerminalSurface {
    regions: MemorySurface,
    last_frame: String,
}

impl TerminalSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regions: MemorySurface::full(),
            last_frame: String::new(),
        }
    }

    /// A typed line becomes the response input's value.
    pub fn type_line(&mut self, line: &str) {
        self.regions.type_input(line);
    }

    /// Remaining time as last rendered, when a timer is shown.
    #[must_use]
    pub fn timer_text(&self) -> Option<&str> {
        self.shown(Region::Timer)
    }

    fn shown(&self, region: Region) -> Option<&str> {
        if self.regions.is_visible(region) {
            self.regions.text(region).filter(|text| !text.is_empty())
        } else {
            None
        }
    }

    /// Current screen as text. The timer is left out so ticks do not redraw.
    #[must_use]
    pub fn frame(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let regions = &self.regions;

        for region in [Region::StatusPanel, Region::StatusHint] {
            if let Some(text) = self.shown(region) {
                lines.push(text.to_string());
            }
        }
        if regions.is_visible(Region::ReloadButton) {
            lines.push("Type :reload to try again or :quit to leave.".into());
        }

        if let Some(text) = self.shown(Region::StartPanel) {
            lines.push(text.to_string());
            lines.push("Type :start to begin.".into());
        }

        if regions.is_visible(Region::QuestionPanel) {
            let badge = regions.text(Region::TypeBadge).unwrap_or_default();
            let counter = regions.text(Region::QuestionCounter).unwrap_or_default();
            let progress = regions.text(Region::Progress).unwrap_or_default();
            lines.push(format!("[{badge}] {counter} ({progress})"));
            lines.push(format!("  {}", regions.text(Region::QuestionText).unwrap_or_default()));
            if regions.is_visible(Region::ExamplePanel) {
                let example = regions.text(Region::ExampleText).unwrap_or_default();
                lines.push(format!("  Example: {example}"));
            }
            if regions.is_visible(Region::DefinitionPanel) {
                let definition = regions.text(Region::DefinitionText).unwrap_or_default();
                lines.push(format!("  Definition: {definition}"));
            }
            if let Some(context) = self.shown(Region::ContextPanel) {
                lines.push(format!("  {context}"));
            }
            let answer = regions.read_value(Region::ResponseInput).unwrap_or_default();
            if !answer.is_empty() {
                lines.push(format!("  Your sentence: {answer}"));
            }
            lines.push(self.navigation_hint());
        }

        if let Some(text) = self.shown(Region::SubmitError) {
            lines.push(text.to_string());
        }

        if regions.is_visible(Region::CompletionPanel) {
            lines.push("Test complete.".into());
            for region in [Region::ResultMessage, Region::AnsweredCount] {
                if let Some(text) = regions.text(region).filter(|text| !text.is_empty()) {
                    lines.push(format!("  {text}"));
                }
            }
            if let Some(elapsed) = regions.text(Region::ElapsedTime) {
                lines.push(format!("  Time taken: {elapsed}"));
            }
            lines.push("Type :download to save the results or :quit to leave.".into());
        }

        if let Some(text) = self.shown(Region::DownloadNotice) {
            lines.push(text.to_string());
        }

        lines.join("\n")
    }

    fn navigation_hint(&self) -> String {
        let regions = &self.regions;
        let mut commands = Vec::new();
        if regions.is_enabled(Region::PrevButton) {
            commands.push(":prev");
        }
        if regions.is_visible(Region::NextButton) {
            commands.push(":next");
        }
        if regions.is_visible(Region::FinishButton) && regions.is_enabled(Region::FinishButton) {
            commands.push(":finish");
        }
        if self.timer_text().is_some() {
            commands.push(":time");
        }
        format!("  Write a sentence, then {}", commands.join(" "))
    }

    /// Print the frame if it differs from the last one printed.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn draw(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let frame = self.frame();
        if frame == self.last_frame {
            return Ok(false);
        }
        writeln!(out, "{frame}")?;
        writeln!(out)?;
        out.flush()?;
        self.last_frame = frame;
        Ok(true)
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TerminalSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.regions.set_text(region, text);
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        self.regions.set_visible(region, visible);
    }

    fn set_enabled(&mut self, region: Region, enabled: bool) {
        self.regions.set_enabled(region, enabled);
    }

    fn set_class(&mut self, region: Region, class: &str) {
        self.regions.set_class(region, class);
    }

    fn set_value(&mut self, region: Region, value: &str) {
        self.regions.set_value(region, value);
    }

    fn read_value(&self, region: Region) -> Option<String> {
        self.regions.read_value(region)
    }
}
