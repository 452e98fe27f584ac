use serde::Serialize;

/// One dependency named by an argument clause: `authRepository: AuthRepository`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArgumentBinding {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ArgumentBinding {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// `name: Type`, usable as a parameter or a property declaration tail.
    pub fn parameter(&self) -> String {
        format!("{}: {}", self.name, self.ty)
    }

    /// `name: name`, forwarding a same-named local as an argument.
    pub fn argument(&self) -> String {
        format!("{0}: {0}", self.name)
    }
}
