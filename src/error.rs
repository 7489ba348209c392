use crate::surface::ElementId;

/// Why [`crate::DragRegistry::activate`] refused to create a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivateError {
    /// [`crate::DragMode::SnapToTarget`] was requested without any target.
    MissingTargets,

    /// The source selector resolved to no element.
    SourceNotFound { selector: String },

    /// Another live session is already bound to this element.
    AlreadyBound { element: ElementId },

    /// The surface could not measure the element.
    NoGeometry { element: ElementId },
}

impl std::fmt::Display for ActivateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTargets => {
                write!(f, "snap-to-target mode requires at least one target")
            }
            Self::SourceNotFound { selector } => {
                write!(f, "no element matches selector {selector:?}")
            }
            Self::AlreadyBound { element } => {
                write!(f, "element {} is already draggable", element.0)
            }
            Self::NoGeometry { element } => {
                write!(f, "element {} has no geometry", element.0)
            }
        }
    }
}

impl std::error::Error for ActivateError {}
