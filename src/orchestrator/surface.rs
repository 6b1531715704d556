/// The two UI elements a generation attempt drives: the description field and
/// the control that triggered it. Owned by the orchestrator for the whole
/// attempt; nothing else writes to them meanwhile.
pub trait DescriptionSurface {
    fn field_text(&self) -> String;
    fn set_field_text(&mut self, text: &str);

    fn trigger_label(&self) -> String;
    fn set_trigger_label(&mut self, label: &str);
    fn set_trigger_enabled(&mut self, enabled: bool);

    /// Inline error next to the trigger.
    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);

    /// Whether the success label and inline error stay on screen until they
    /// are reverted. Surfaces that only print status have nothing to wait for.
    fn holds_transient_status(&self) -> bool {
        true
    }
}

pub const IDLE_LABEL: &str = "🤖 Generate Description";
pub const GATHERING_LABEL: &str = "🔄 Gathering PR data...";
pub const GENERATING_LABEL: &str = "🤖 Generating with AI...";
pub const GENERATED_LABEL: &str = "✅ Generated!";

pub const GATHERING_PLACEHOLDER: &str =
    "Generating PR description...\n\nGathering commit information and analyzing changes...";
pub const GENERATING_PLACEHOLDER: &str =
    "Crafting description using AI...\n\nAnalyzing changes and formatting content...";

/// True when the field still shows one of our progress placeholders.
pub fn is_placeholder(text: &str) -> bool {
    text == GATHERING_PLACEHOLDER || text == GENERATING_PLACEHOLDER
}
