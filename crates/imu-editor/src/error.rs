use thiserror::Error;

/// Why an action did nothing.
///
/// None of these are fatal: the caller logs them and, when
/// [`user_message`](Self::user_message) has something to say, shows it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("nothing is selected")]
    NothingSelected,

    #[error("exactly one feature must be selected, got {0}")]
    SingleSelectionRequired(usize),

    #[error("failed to parse {field}: {raw:?}")]
    InvalidInput { field: &'static str, raw: String },

    #[error("no active drawing layer")]
    NoActiveLayer,

    #[error("unknown layer {0}")]
    UnknownLayer(String),
}

impl ActionError {
    /// Message-box text, in the host UI's language.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ActionError::NothingSelected => Some("Veuiller sélectionner un ou des objects."),
            ActionError::SingleSelectionRequired(0) => Some("Veuiller sélectionner un object."),
            ActionError::SingleSelectionRequired(_) => {
                Some("Veuiller sélectionner un seul object.")
            }
            ActionError::InvalidInput { .. }
            | ActionError::NoActiveLayer
            | ActionError::UnknownLayer(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_selection_messages() {
        assert_eq!(
            ActionError::SingleSelectionRequired(0).user_message(),
            Some("Veuiller sélectionner un object.")
        );
        assert_eq!(
            ActionError::SingleSelectionRequired(3).user_message(),
            Some("Veuiller sélectionner un seul object.")
        );
    }

    #[test]
    fn input_errors_are_silent() {
        let err = ActionError::InvalidInput {
            field: "width",
            raw: "abc".into(),
        };
        assert_eq!(err.user_message(), None);
        assert_eq!(err.to_string(), r#"failed to parse width: "abc""#);
    }
}
