//! Naming and convention resolution.
//!
//! Everything here is a deterministic string transform. Type predicates work
//! on the type text as written; nothing is resolved semantically.

use serde::{Deserialize, Serialize};

/// Decapitalizes the first character: `AuthRepository` → `authRepository`.
pub fn as_variable_name(ty: &str) -> String {
    let mut chars = ty.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Removes a literal suffix if present, otherwise returns the input.
pub fn strip_suffix<'a>(ty: &'a str, suffix: &str) -> &'a str {
    ty.strip_suffix(suffix).unwrap_or(ty)
}

/// Appends a literal suffix.
pub fn add_suffix(ty: &str, suffix: &str) -> String {
    format!("{ty}{suffix}")
}

/// Drops a leading `any ` / `some ` qualifier.
pub fn strip_existential(ty: &str) -> &str {
    let trimmed = ty.trim();
    for qualifier in ["any", "some"] {
        if let Some(rest) = trimmed.strip_prefix(qualifier) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    trimmed
}

/// `true` for `T?` and `Optional<T>`.
pub fn is_optional_type(ty: &str) -> bool {
    let ty = ty.trim();
    ty.ends_with('?') || ty.starts_with("Optional<")
}

/// `true` for `[T]` and `Array<T>`, optionally followed by `?`.
pub fn is_array_type(ty: &str) -> bool {
    array_element_type(ty).is_some()
}

/// Element type of `[T]` / `Array<T>` (optionally `?`), when `T` is a plain word.
pub fn array_element_type(ty: &str) -> Option<&str> {
    let ty = ty.trim();
    let ty = ty.strip_suffix('?').unwrap_or(ty).trim_end();

    let inner = if let Some(rest) = ty.strip_prefix('[') {
        rest.strip_suffix(']')?
    } else if let Some(rest) = ty.strip_prefix("Array") {
        rest.trim_start().strip_prefix('<')?.strip_suffix('>')?
    } else {
        return None;
    };

    let inner = inner.trim();
    let is_word = !inner.is_empty() && inner.chars().all(|c| c.is_alphanumeric() || c == '_');
    is_word.then_some(inner)
}

/// Default literal used by synthesized memberwise initializers.
pub fn default_value_literal(ty: &str) -> Option<&'static str> {
    if is_optional_type(ty) {
        return Some("nil");
    }
    if is_array_type(ty) {
        return Some("[]");
    }
    match ty.trim() {
        "String" => Some("\"\""),
        "Int" | "Int8" | "Int16" | "Int32" | "Int64" | "UInt" | "UInt8" | "UInt16" | "UInt32"
        | "UInt64" | "Double" | "Float" | "Float32" | "Float64" | "CGFloat" | "Decimal" => {
            Some("0")
        }
        "Bool" => Some("false"),
        "UUID" => Some("UUID()"),
        "Date" => Some(".now"),
        _ => None,
    }
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Literal names the generator rules derive identifiers from.
///
/// Defaults reproduce the canonical DataSource → Repository → UseCase →
/// Service → Container layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Suffix that marks transport (wire) models: `UserData`.
    pub transport_suffix: String,
    /// Prefix of default implementations: `DefaultAuthRepository`.
    pub default_prefix: String,
    pub repository_suffix: String,
    pub data_source_suffix: String,
    /// Property holding the data source factory inside repository factories.
    pub data_source_factory: String,
    /// Property holding the repository factory inside use case factories.
    pub repository_factory: String,
    /// Parameter/property name of the injected use case factory.
    pub use_case_factory: String,
    /// Type instantiated by service containers.
    pub use_case_factory_type: String,
    /// Parameter type of service container initializers.
    pub environment_type: String,
    /// Substring marking use case fields in services.
    pub use_case_marker: String,
    /// Substring marking service fields in containers.
    pub service_marker: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            transport_suffix: "Data".to_string(),
            default_prefix: "Default".to_string(),
            repository_suffix: "Repository".to_string(),
            data_source_suffix: "DataSource".to_string(),
            data_source_factory: "dataSourceFactory".to_string(),
            repository_factory: "repositoryFactory".to_string(),
            use_case_factory: "useCaseFactory".to_string(),
            use_case_factory_type: "UseCaseFactory".to_string(),
            environment_type: "AppEnvironment".to_string(),
            use_case_marker: "UseCase".to_string(),
            service_marker: "Service".to_string(),
        }
    }
}

impl Conventions {
    /// `AuthRepository` → `DefaultAuthRepository`.
    pub fn default_implementation(&self, contract: &str) -> String {
        format!("{}{}", self.default_prefix, strip_existential(contract))
    }

    /// `AuthRepository` → `makeAuthRepository`.
    pub fn factory_method(&self, ty: &str) -> String {
        format!("make{}", strip_existential(ty))
    }

    /// `AuthRepository` → `AuthDataSource`.
    pub fn data_source_for_repository(&self, repository: &str) -> String {
        let stem = strip_suffix(strip_existential(repository), &self.repository_suffix);
        add_suffix(stem, &self.data_source_suffix)
    }

    /// `UserData` → `User`; `None` when the suffix is missing.
    pub fn domain_model_name<'a>(&self, transport: &'a str) -> Option<&'a str> {
        transport
            .strip_suffix(self.transport_suffix.as_str())
            .filter(|stem| !stem.is_empty())
    }

    /// `true` when a type is spelled as a transport model (`UserData`, `[UserData]?`).
    pub fn is_transport_type(&self, ty: &str) -> bool {
        let base = array_element_type(ty).unwrap_or_else(|| ty.trim().trim_end_matches('?'));
        self.domain_model_name(base).is_some()
    }

    /// Service fields hold use cases when their type mentions the use case marker.
    pub fn is_use_case_type(&self, ty: &str) -> bool {
        contains_ignore_case(ty, &self.use_case_marker)
    }

    /// Container fields are services when their name mentions the service marker.
    pub fn is_service_field(&self, name: &str) -> bool {
        contains_ignore_case(name, &self.service_marker)
    }

    /// `UseCase` protocol name for an annotated type: `Login` → `LoginUseCase`.
    pub fn use_case_protocol(&self, name: &str) -> String {
        add_suffix(name, &self.use_case_marker)
    }

    /// Implementation class name for an annotated type: `Login` → `LoginDefaultUseCase`.
    pub fn use_case_implementation(&self, name: &str) -> String {
        format!("{name}{}{}", self.default_prefix, self.use_case_marker)
    }

    /// Factory name for an annotated type: `Login` → `LoginFactory`.
    pub fn use_case_factory_name(&self, name: &str) -> String {
        format!("{name}Factory")
    }

    /// Peer modifier name: `ServiceContainer` → `ServiceContainerModifier`.
    pub fn modifier_name(&self, container: &str) -> String {
        format!("{container}Modifier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_as_variable_name() {
        assert_eq!(as_variable_name("AuthRepository"), "authRepository");
        assert_eq!(as_variable_name("URLSession"), "uRLSession");
        assert_eq!(as_variable_name("x"), "x");
        assert_eq!(as_variable_name(""), "");
    }

    #[test]
    fn test_strip_and_add_suffix() {
        assert_eq!(strip_suffix("AuthRepository", "Repository"), "Auth");
        assert_eq!(strip_suffix("Auth", "Repository"), "Auth");
        assert_eq!(add_suffix("Auth", "DataSource"), "AuthDataSource");
    }

    #[test]
    fn test_optional_detection() {
        assert!(is_optional_type("String?"));
        assert!(is_optional_type("Optional<String>"));
        assert!(is_optional_type("[String]?"));
        assert!(!is_optional_type("String"));
    }

    #[test]
    fn test_array_detection() {
        assert!(is_array_type("[String]"));
        assert!(is_array_type("[ UserData ]"));
        assert!(is_array_type("Array<Int>"));
        assert!(is_array_type("[UserData]?"));
        assert!(!is_array_type("[String: Int]"));
        assert!(!is_array_type("Set<Int>"));
        assert!(!is_array_type("String"));

        assert_eq!(array_element_type("[UserData]?"), Some("UserData"));
        assert_eq!(array_element_type("Array< Int >"), Some("Int"));
        assert_eq!(array_element_type("[[Int]]"), None);
    }

    #[test]
    fn test_default_value_literals() {
        assert_eq!(default_value_literal("String?"), Some("nil"));
        assert_eq!(default_value_literal("[String]"), Some("[]"));
        assert_eq!(default_value_literal("String"), Some("\"\""));
        assert_eq!(default_value_literal("Int"), Some("0"));
        assert_eq!(default_value_literal("Double"), Some("0"));
        assert_eq!(default_value_literal("Bool"), Some("false"));
        assert_eq!(default_value_literal("UUID"), Some("UUID()"));
        assert_eq!(default_value_literal("Date"), Some(".now"));
        assert_eq!(default_value_literal("Profile"), None);
    }

    #[test]
    fn test_strip_existential() {
        assert_eq!(strip_existential("any AuthDataSource"), "AuthDataSource");
        assert_eq!(strip_existential("some View"), "View");
        assert_eq!(strip_existential("anything"), "anything");
    }

    #[test]
    fn test_convention_names() {
        let c = Conventions::default();
        assert_eq!(c.default_implementation("AuthRepository"), "DefaultAuthRepository");
        assert_eq!(c.factory_method("any AuthDataSource"), "makeAuthDataSource");
        assert_eq!(c.data_source_for_repository("AuthRepository"), "AuthDataSource");
        assert_eq!(c.domain_model_name("UserData"), Some("User"));
        assert_eq!(c.domain_model_name("User"), None);
        assert_eq!(c.domain_model_name("Data"), None);
        assert!(c.is_transport_type("[ProfileData]?"));
        assert!(!c.is_transport_type("String"));
        assert_eq!(c.use_case_implementation("Login"), "LoginDefaultUseCase");
        assert_eq!(c.modifier_name("ServiceContainer"), "ServiceContainerModifier");
    }

    #[test]
    fn test_heuristic_predicates() {
        let c = Conventions::default();
        assert!(c.is_use_case_type("LoginUseCase"));
        assert!(c.is_use_case_type("any FetchUsecase"));
        assert!(!c.is_use_case_type("AuthRepository"));
        assert!(c.is_service_field("authService"));
        assert!(c.is_service_field("SERVICE"));
        assert!(!c.is_service_field("environment"));
    }

    proptest! {
        #[test]
        fn prop_suffix_round_trip(ty in "[A-Z][a-zA-Z0-9]{0,12}", suffix in "[A-Z][a-zA-Z]{0,8}") {
            let joined = add_suffix(&ty, &suffix);
            prop_assert_eq!(strip_suffix(&joined, &suffix), ty.as_str());
        }

        #[test]
        fn prop_variable_name_keeps_tail(ty in "[A-Z][a-zA-Z0-9]{0,12}") {
            let name = as_variable_name(&ty);
            prop_assert_eq!(&name[1..], &ty[1..]);
            prop_assert!(name.starts_with(|c: char| c.is_ascii_lowercase()));
        }
    }
}
