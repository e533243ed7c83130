//! The registered field helpers and their variant settings

use std::fmt;
use std::str::FromStr;

use super::descriptor::{ClassNames, FieldConfig, FieldType};
use crate::error::MixinError;

/// Base rendering behaviour of a helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Labelled text-like input
    Text,
    /// Fieldset of radios or checkboxes
    OptionGroup,
    /// Option group rendered as a dropdown with text input attributes
    Select,
    /// Single checkbox
    Checkbox,
    /// Submit button
    Submit,
    /// Opening error group fieldset
    ErrorGroup,
    /// Closing error group marker
    ErrorGroupEnd,
    /// Day, month and year inputs
    Date {
        /// Wrap the inputs in an error group
        grouped: bool,
    },
}

/// A field helper invocable from templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mixin {
    /// `input-text`
    InputText,
    /// `input-text-compound`
    InputTextCompound,
    /// `input-text-code`
    InputTextCode,
    /// `input-number`
    InputNumber,
    /// `input-phone`
    InputPhone,
    /// `textarea`
    Textarea,
    /// `radio-group`
    RadioGroup,
    /// `checkbox-group`
    CheckboxGroup,
    /// `select`
    Select,
    /// `checkbox`
    Checkbox,
    /// `checkbox-compound`
    CheckboxCompound,
    /// `checkbox-required`
    CheckboxRequired,
    /// `input-submit`
    InputSubmit,
    /// `error-group`
    ErrorGroup,
    /// `error-group-end`
    ErrorGroupEnd,
    /// `input-date`
    InputDate,
    /// `input-date-group`
    InputDateGroup,
}

/// Per-helper adjustments on top of the base behaviour
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    /// Defaults merged below the static field configuration
    pub defaults: FieldConfig,
    /// Report the field as required whatever its configuration says
    pub force_required: bool,
    /// Maximum length used when none is configured
    pub maxlength_fallback: Option<u32>,
}

impl Mixin {
    /// Every registered helper
    pub const ALL: [Self; 17] = [
        Self::InputText,
        Self::InputTextCompound,
        Self::InputTextCode,
        Self::InputNumber,
        Self::InputPhone,
        Self::Textarea,
        Self::RadioGroup,
        Self::CheckboxGroup,
        Self::Select,
        Self::Checkbox,
        Self::CheckboxCompound,
        Self::CheckboxRequired,
        Self::InputSubmit,
        Self::ErrorGroup,
        Self::ErrorGroupEnd,
        Self::InputDate,
        Self::InputDateGroup,
    ];

    /// Name the helper is registered under
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InputText => "input-text",
            Self::InputTextCompound => "input-text-compound",
            Self::InputTextCode => "input-text-code",
            Self::InputNumber => "input-number",
            Self::InputPhone => "input-phone",
            Self::Textarea => "textarea",
            Self::RadioGroup => "radio-group",
            Self::CheckboxGroup => "checkbox-group",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::CheckboxCompound => "checkbox-compound",
            Self::CheckboxRequired => "checkbox-required",
            Self::InputSubmit => "input-submit",
            Self::ErrorGroup => "error-group",
            Self::ErrorGroupEnd => "error-group-end",
            Self::InputDate => "input-date",
            Self::InputDateGroup => "input-date-group",
        }
    }

    /// Base behaviour
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::InputText
            | Self::InputTextCompound
            | Self::InputTextCode
            | Self::InputNumber
            | Self::InputPhone
            | Self::Textarea => FieldKind::Text,
            Self::RadioGroup | Self::CheckboxGroup => FieldKind::OptionGroup,
            Self::Select => FieldKind::Select,
            Self::Checkbox | Self::CheckboxCompound | Self::CheckboxRequired => FieldKind::Checkbox,
            Self::InputSubmit => FieldKind::Submit,
            Self::ErrorGroup => FieldKind::ErrorGroup,
            Self::ErrorGroupEnd => FieldKind::ErrorGroupEnd,
            Self::InputDate => FieldKind::Date { grouped: false },
            Self::InputDateGroup => FieldKind::Date { grouped: true },
        }
    }

    /// Partial template the helper renders, if it renders one directly
    #[must_use]
    pub const fn partial(self) -> Option<&'static str> {
        match self {
            Self::Textarea => Some("partials/forms/textarea-group"),
            Self::Select => Some("partials/forms/select"),
            Self::InputSubmit => Some("partials/forms/input-submit"),
            Self::ErrorGroup => Some("partials/forms/error-group"),
            Self::ErrorGroupEnd => Some("partials/forms/error-group-end"),
            Self::InputDate | Self::InputDateGroup => None,
            _ => match self.kind() {
                FieldKind::OptionGroup => Some("partials/forms/option-group"),
                FieldKind::Checkbox => Some("partials/forms/checkbox"),
                _ => Some("partials/forms/input-text-group"),
            },
        }
    }

    /// Type reported when the field configures none
    #[must_use]
    pub const fn default_type(self) -> FieldType {
        match self {
            Self::RadioGroup => FieldType::Radio,
            Self::CheckboxGroup => FieldType::Checkbox,
            Self::Select => FieldType::Group,
            _ => FieldType::Text,
        }
    }

    /// Variant adjustments for this helper
    #[must_use]
    pub fn variant(self) -> Variant {
        let mut variant = Variant::default();
        match self {
            Self::InputTextCompound | Self::CheckboxCompound => {
                variant.defaults.compound = Some(true);
            }
            Self::InputTextCode => {
                variant.defaults.class_name = Some(ClassNames::from("input-code"));
            }
            Self::InputNumber => {
                variant.defaults.pattern = Some("[0-9]*".to_string());
            }
            Self::InputPhone => variant.maxlength_fallback = Some(18),
            Self::CheckboxRequired => variant.force_required = true,
            _ => {}
        }
        variant
    }
}

impl FromStr for Mixin {
    type Err = MixinError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mixin| mixin.name() == name)
            .ok_or_else(|| MixinError::UnknownMixin(name.to_string()))
    }
}

impl fmt::Display for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for mixin in Mixin::ALL {
            assert_eq!(mixin.name().parse::<Mixin>().unwrap(), mixin);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "input-colour".parse::<Mixin>().unwrap_err();
        assert!(matches!(err, MixinError::UnknownMixin(name) if name == "input-colour"));
    }

    #[test]
    fn test_partials() {
        assert_eq!(Mixin::InputPhone.partial(), Some("partials/forms/input-text-group"));
        assert_eq!(Mixin::Textarea.partial(), Some("partials/forms/textarea-group"));
        assert_eq!(Mixin::RadioGroup.partial(), Some("partials/forms/option-group"));
        assert_eq!(Mixin::CheckboxRequired.partial(), Some("partials/forms/checkbox"));
        assert_eq!(Mixin::InputDate.partial(), None);
    }

    #[test]
    fn test_variants() {
        assert_eq!(Mixin::InputNumber.variant().defaults.pattern.as_deref(), Some("[0-9]*"));
        assert_eq!(Mixin::CheckboxCompound.variant().defaults.compound, Some(true));
        assert_eq!(Mixin::InputPhone.variant().maxlength_fallback, Some(18));
        assert!(Mixin::CheckboxRequired.variant().force_required);
        assert_eq!(Mixin::InputText.variant(), Variant::default());
    }
}
