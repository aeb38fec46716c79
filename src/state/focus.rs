#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    NameField,
    DescriptionField,
    DefaultToggle,
    ContentEditor,
    VariablesPanel,
}

impl Focus {
    /// Cycle order: Sidebar → Name → Description → Default → Content →
    /// Variables → Sidebar
    pub fn next(&self) -> Focus {
        match self {
            Focus::Sidebar => Focus::NameField,
            Focus::NameField => Focus::DescriptionField,
            Focus::DescriptionField => Focus::DefaultToggle,
            Focus::DefaultToggle => Focus::ContentEditor,
            Focus::ContentEditor => Focus::VariablesPanel,
            Focus::VariablesPanel => Focus::Sidebar,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::Sidebar => Focus::VariablesPanel,
            Focus::NameField => Focus::Sidebar,
            Focus::DescriptionField => Focus::NameField,
            Focus::DefaultToggle => Focus::DescriptionField,
            Focus::ContentEditor => Focus::DefaultToggle,
            Focus::VariablesPanel => Focus::ContentEditor,
        }
    }
}
