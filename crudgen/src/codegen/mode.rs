//! The add-vs-update lifecycle embedded in every generated entity class
//!
//! The machine is described as data: its states, which state each constructor
//! starts in, and which save outcome moves it where. The business-layer
//! synthesizer renders the `enMode` enum, the constructor assignments and the
//! `Save()` dispatch from this description.

/// Lifecycle state of a generated entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    AddNew,
    Update,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::AddNew => "AddNew",
            Mode::Update => "Update",
        }
    }
}

/// The generated constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorKind {
    /// Zero-argument constructor for a new row
    Public,
    /// Full-argument constructor for a loaded row
    Private,
}

/// Events that can move the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    InsertSucceeded,
}

/// What `Save()` runs in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveAction {
    Insert,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub on: Trigger,
    pub to: Mode,
}

/// Declarative description of the entity lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMachine {
    pub enum_name: &'static str,
    pub field_name: &'static str,
    pub states: Vec<Mode>,
    /// State each constructor leaves the entity in
    pub initial: Vec<(ConstructorKind, Mode)>,
    /// What `Save()` runs per state
    pub save_actions: Vec<(Mode, SaveAction)>,
    pub transitions: Vec<Transition>,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self {
            enum_name: "enMode",
            field_name: "_Mode",
            states: vec![Mode::AddNew, Mode::Update],
            initial: vec![
                (ConstructorKind::Public, Mode::AddNew),
                (ConstructorKind::Private, Mode::Update),
            ],
            save_actions: vec![
                (Mode::AddNew, SaveAction::Insert),
                (Mode::Update, SaveAction::Update),
            ],
            transitions: vec![Transition {
                from: Mode::AddNew,
                on: Trigger::InsertSucceeded,
                to: Mode::Update,
            }],
        }
    }
}

impl ModeMachine {
    /// State an entity starts in after the given constructor.
    ///
    /// Constructors missing from the table start in the first declared state.
    pub fn initial(&self, constructor: ConstructorKind) -> Mode {
        self.initial
            .iter()
            .find(|(kind, _)| *kind == constructor)
            .map(|(_, mode)| *mode)
            .or_else(|| self.states.first().copied())
            .unwrap_or(Mode::AddNew)
    }

    /// Action `Save()` performs in a state; unlisted states update
    pub fn save_action(&self, mode: Mode) -> SaveAction {
        self.save_actions
            .iter()
            .find(|(state, _)| *state == mode)
            .map(|(_, action)| *action)
            .unwrap_or(SaveAction::Update)
    }

    /// Transition out of `from` on `trigger`, if any
    pub fn transition(&self, from: Mode, trigger: Trigger) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.on == trigger)
    }

    /// State after `trigger`; states without a matching transition are kept
    pub fn next(&self, from: Mode, trigger: Trigger) -> Mode {
        self.transition(from, trigger).map(|t| t.to).unwrap_or(from)
    }

    /// `public enum enMode { AddNew, Update }` plus the private field
    pub fn render_declaration(&self) -> String {
        let states: Vec<&str> = self.states.iter().map(Mode::as_str).collect();
        format!(
            "\npublic enum {enum_name} {{ {states} }}\nprivate {enum_name} {field};",
            enum_name = self.enum_name,
            states = states.join(", "),
            field = self.field_name,
        )
    }

    /// Assignment a constructor ends with
    pub fn render_initial_assignment(&self, constructor: ConstructorKind) -> String {
        self.render_assignment(None, self.initial(constructor))
    }

    /// `this._Mode = [qualifier.]enMode.X;`
    pub fn render_assignment(&self, qualifier: Option<&str>, mode: Mode) -> String {
        let enum_path = match qualifier {
            Some(class) => format!("{}.{}", class, self.enum_name),
            None => self.enum_name.to_string(),
        };
        format!("this.{} = {}.{};", self.field_name, enum_path, mode.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_states() {
        let machine = ModeMachine::default();
        assert_eq!(machine.initial(ConstructorKind::Public), Mode::AddNew);
        assert_eq!(machine.initial(ConstructorKind::Private), Mode::Update);
    }

    #[test]
    fn test_save_sequence() {
        let machine = ModeMachine::default();
        let mut mode = machine.initial(ConstructorKind::Public);
        assert_eq!(machine.save_action(mode), SaveAction::Insert);

        mode = machine.next(mode, Trigger::InsertSucceeded);
        assert_eq!(mode, Mode::Update);
        assert_eq!(machine.save_action(mode), SaveAction::Update);

        // No way back out of Update
        assert_eq!(machine.next(mode, Trigger::InsertSucceeded), Mode::Update);
    }

    #[test]
    fn test_custom_tables_drive_lookups() {
        let machine = ModeMachine {
            initial: vec![(ConstructorKind::Public, Mode::Update)],
            save_actions: vec![(Mode::Update, SaveAction::Insert)],
            ..ModeMachine::default()
        };
        assert_eq!(machine.initial(ConstructorKind::Public), Mode::Update);
        assert_eq!(machine.save_action(Mode::Update), SaveAction::Insert);
        assert_eq!(
            machine.render_initial_assignment(ConstructorKind::Public),
            "this._Mode = enMode.Update;"
        );

        // Unlisted entries fall back
        assert_eq!(machine.initial(ConstructorKind::Private), Mode::AddNew);
        assert_eq!(machine.save_action(Mode::AddNew), SaveAction::Update);
    }

    #[test]
    fn test_render_declaration() {
        let machine = ModeMachine::default();
        assert_eq!(
            machine.render_declaration(),
            "\npublic enum enMode { AddNew, Update }\nprivate enMode _Mode;"
        );
    }

    #[test]
    fn test_render_assignments() {
        let machine = ModeMachine::default();
        assert_eq!(
            machine.render_initial_assignment(ConstructorKind::Public),
            "this._Mode = enMode.AddNew;"
        );
        assert_eq!(
            machine.render_assignment(Some("clsProduct"), Mode::Update),
            "this._Mode = clsProduct.enMode.Update;"
        );
    }
}
