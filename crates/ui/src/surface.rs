use std::collections::HashMap;

/// Named areas of the test screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Loading, error and no-questions messages share this panel.
    StatusPanel,
    StatusHint,
    ReloadButton,
    StartPanel,
    StartButton,
    QuestionPanel,
    TypeBadge,
    QuestionCounter,
    QuestionText,
    ExamplePanel,
    ExampleText,
    DefinitionPanel,
    DefinitionText,
    ContextPanel,
    ResponseInput,
    Progress,
    PrevButton,
    NextButton,
    FinishButton,
    Timer,
    SubmitError,
    CompletionPanel,
    AnsweredCount,
    ElapsedTime,
    ResultMessage,
    DownloadNotice,
}

impl Region {
    pub const ALL: [Region; 26] = [
        Region::StatusPanel,
        Region::StatusHint,
        Region::ReloadButton,
        Region::StartPanel,
        Region::StartButton,
        Region::QuestionPanel,
        Region::TypeBadge,
        Region::QuestionCounter,
        Region::QuestionText,
        Region::ExamplePanel,
        Region::ExampleText,
        Region::DefinitionPanel,
        Region::DefinitionText,
        Region::ContextPanel,
        Region::ResponseInput,
        Region::Progress,
        Region::PrevButton,
        Region::NextButton,
        Region::FinishButton,
        Region::Timer,
        Region::SubmitError,
        Region::CompletionPanel,
        Region::AnsweredCount,
        Region::ElapsedTime,
        Region::ResultMessage,
        Region::DownloadNotice,
    ];
}

/// What a session view needs from whatever draws it.
///
/// Implementations must treat a region they do not have as a no-op.
pub trait RenderSurface {
    fn set_text(&mut self, region: Region, text: &str);
    fn set_visible(&mut self, region: Region, visible: bool);
    fn set_enabled(&mut self, region: Region, enabled: bool);
    fn set_class(&mut self, region: Region, class: &str);
    fn set_value(&mut self, region: Region, value: &str);
    /// Current value of an input region, `None` when the region is absent.
    fn read_value(&self, region: Region) -> Option<String>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionState {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
    pub class: String,
    pub value: String,
}

/// In-memory surface that records the latest state of every region it has.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    regions: HashMap<Region, RegionState>,
    writes: usize,
}

impl MemorySurface {
    /// A surface with every region present.
    #[must_use]
    pub fn full() -> Self {
        Self::with_regions(&Region::ALL)
    }

    /// A partial surface; writes to other regions are dropped.
    #[must_use]
    pub fn with_regions(regions: &[Region]) -> Self {
        let regions = regions
            .iter()
            .map(|region| {
                (
                    *region,
                    RegionState {
                        enabled: true,
                        ..RegionState::default()
                    },
                )
            })
            .collect();
        Self { regions, writes: 0 }
    }

    /// Simulates the user typing into the response input.
    pub fn type_input(&mut self, value: &str) {
        if let Some(state) = self.regions.get_mut(&Region::ResponseInput) {
            state.value = value.to_string();
        }
    }

    #[must_use]
    pub fn region(&self, region: Region) -> Option<&RegionState> {
        self.regions.get(&region)
    }

    #[must_use]
    pub fn text(&self, region: Region) -> Option<&str> {
        self.region(region).map(|state| state.text.as_str())
    }

    #[must_use]
    pub fn is_visible(&self, region: Region) -> bool {
        self.region(region).is_some_and(|state| state.visible)
    }

    #[must_use]
    pub fn is_enabled(&self, region: Region) -> bool {
        self.region(region).is_some_and(|state| state.enabled)
    }

    #[must_use]
    pub fn class(&self, region: Region) -> Option<&str> {
        self.region(region).map(|state| state.class.as_str())
    }

    /// Number of writes that landed on a present region.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn update(&mut self, region: Region, apply: impl FnOnce(&mut RegionState)) {
        if let Some(state) = self.regions.get_mut(&region) {
            apply(state);
            self.writes += 1;
        }
    }
}

impl RenderSurface for MemorySurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.update(region, |state| state.text = text.to_string());
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        self.update(region, |state| state.visible = visible);
    }

    fn set_enabled(&mut self, region: Region, enabled: bool) {
        self.update(region, |state| state.enabled = enabled);
    }

    fn set_class(&mut self, region: Region, class: &str) {
        self.update(region, |state| state.class = class.to_string());
    }

    fn set_value(&mut self, region: Region, value: &str) {
        self.update(region, |state| state.value = value.to_string());
    }

    fn read_value(&self, region: Region) -> Option<String> {
        self.region(region).map(|state| state.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_regions_are_ignored() {
        let mut surface = MemorySurface::with_regions(&[Region::QuestionText]);
        surface.set_text(Region::Timer, "09:59");
        surface.set_visible(Region::CompletionPanel, true);
        surface.type_input("ignored");

        assert_eq!(surface.text(Region::Timer), None);
        assert_eq!(surface.read_value(Region::ResponseInput), None);
        assert_eq!(surface.write_count(), 0);

        surface.set_text(Region::QuestionText, "run");
        assert_eq!(surface.text(Region::QuestionText), Some("run"));
        assert_eq!(surface.write_count(), 1);
    }

    #[test]
    fn typed_input_is_readable() {
        let mut surface = MemorySurface::full();
        surface.type_input("I run fast.");
        assert_eq!(
            surface.read_value(Region::ResponseInput).as_deref(),
            Some("I run fast.")
        );
    }
}
