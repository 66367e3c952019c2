//! The closed set of refactorings, with their stable ids, config keys and defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! refactorings {
    ($($variant:ident => ($id:literal, $key:literal, $default:literal, $title:literal),)+) => {
        /// Identifier of one refactoring in the catalogue.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum RefactoringId {
            $(
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl RefactoringId {
            pub const ALL: &'static [RefactoringId] = &[$(RefactoringId::$variant,)+];

            /// Stable id, e.g. `RR0075`.
            pub fn id(self) -> &'static str {
                match self {
                    $(RefactoringId::$variant => $id,)+
                }
            }

            /// Snake-case key used in `sharp.toml`.
            pub fn config_key(self) -> &'static str {
                match self {
                    $(RefactoringId::$variant => $key,)+
                }
            }

            /// Default action title. Some refactorings build their title from the
            /// matched code and use this as a template.
            pub fn title(self) -> &'static str {
                match self {
                    $(RefactoringId::$variant => $title,)+
                }
            }

            pub fn enabled_by_default(self) -> bool {
                match self {
                    $(RefactoringId::$variant => $default,)+
                }
            }

            pub fn from_id(id: &str) -> Option<RefactoringId> {
                match id {
                    $($id => Some(RefactoringId::$variant),)+
                    _ => None,
                }
            }

            pub fn from_config_key(key: &str) -> Option<RefactoringId> {
                match key {
                    $($key => Some(RefactoringId::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

refactorings! {
    AddBraces => ("RR0002", "add_braces", true, "Add braces"),
    AddBracesToSwitchSection => ("RR0004", "add_braces_to_switch_section", true, "Add braces to section"),
    AddCastExpression => ("RR0015", "add_cast_expression", true, "Cast to 'T'"),
    CheckExpressionForNull => ("RR0024", "check_expression_for_null", true, "Check 'x' for null"),
    CheckParameterForNull => ("RR0025", "check_parameter_for_null", true, "Check parameter for null"),
    UseObjectInitializer => ("RR0026", "use_object_initializer", true, "Collapse to initializer"),
    CommentOutMemberDeclaration => ("RR0027", "comment_out_member_declaration", true, "Comment out member"),
    CommentOutStatement => ("RR0028", "comment_out_statement", true, "Comment out statement"),
    ExpandCompoundAssignment => ("RR0034", "expand_compound_assignment", true, "Expand compound assignment"),
    ConvertExpressionBodyToBlockBody => ("RR0037", "convert_expression_body_to_block_body", true, "Use block body"),
    ExpandInitializer => ("RR0038", "expand_initializer", false, "Expand initializer"),
    ConvertLambdaExpressionBodyToBlockBody => ("RR0039", "convert_lambda_expression_body_to_block_body", true, "Use block body for lambda expression"),
    ExtractExpressionFromCondition => ("RR0043", "extract_expression_from_condition", true, "Extract expression from condition"),
    ExtractTypeDeclarationToNewFile => ("RR0046", "extract_type_declaration_to_new_file", true, "Extract type declaration to a new file"),
    IntroduceConstructor => ("RR0066", "introduce_constructor", false, "Introduce constructor"),
    MergeAttributes => ("RR0074", "merge_attributes", true, "Merge attributes"),
    MergeIfStatements => ("RR0075", "merge_if_statements", true, "Merge if statements"),
    JoinStringExpressions => ("RR0078", "join_string_expressions", true, "Join string expressions"),
    InvertBooleanLiteral => ("RR0080", "invert_boolean_literal", true, "Invert boolean literal"),
    RemoveAllPreprocessorDirectives => ("RR0090", "remove_all_preprocessor_directives", true, "Remove all directives"),
    RemoveBraces => ("RR0094", "remove_braces", true, "Remove braces"),
    RemoveBracesFromSwitchSection => ("RR0096", "remove_braces_from_switch_section", true, "Remove braces from section"),
    RemoveComment => ("RR0098", "remove_comment", true, "Remove comment"),
    RemoveMemberDeclaration => ("RR0103", "remove_member_declaration", true, "Remove member"),
    RemoveParentheses => ("RR0106", "remove_parentheses", true, "Remove parentheses"),
    RemoveRegion => ("RR0108", "remove_region", true, "Remove region"),
    ConvertDoToWhile => ("RR0123", "convert_do_to_while", true, "Convert to 'while'"),
    ConvertIfToSwitch => ("RR0133", "convert_if_to_switch", true, "Convert to 'switch'"),
    InvertPrefixOrPostfixUnaryOperator => ("RR0134", "invert_prefix_or_postfix_unary_operator", true, "Invert operator"),
    ConvertInterpolatedStringToStringLiteral => ("RR0136", "convert_interpolated_string_to_string_literal", true, "Remove '$'"),
    ReplacePrefixOperatorWithPostfixOperator => ("RR0140", "replace_prefix_operator_with_postfix_operator", true, "Use postfix operator"),
    ConvertRegularStringLiteralToVerbatimStringLiteral => ("RR0142", "convert_regular_string_literal_to_verbatim_string_literal", true, "Convert to verbatim string"),
    ConvertVerbatimStringLiteralToRegularStringLiteral => ("RR0148", "convert_verbatim_string_literal_to_regular_string_literal", true, "Convert to regular string"),
    ConvertWhileToDo => ("RR0150", "convert_while_to_do", true, "Convert to 'do'"),
    ConvertWhileToFor => ("RR0151", "convert_while_to_for", true, "Convert to 'for'"),
    SortMemberDeclarations => ("RR0155", "sort_member_declarations", true, "Sort members by kind"),
    SplitAttributes => ("RR0156", "split_attributes", true, "Split attributes"),
    SwapBinaryOperands => ("RR0159", "swap_binary_operands", true, "Swap operands"),
    InvertConditionalExpression => ("RR0160", "invert_conditional_expression", true, "Invert conditional expression"),
    InvertIfElse => ("RR0162", "invert_if_else", true, "Invert if-else"),
    UncommentSingleLineComment => ("RR0163", "uncomment_single_line_comment", true, "Uncomment"),
    ConvertBlockBodyToExpressionBody => ("RR0169", "convert_block_body_to_expression_body", true, "Use expression-bodied member"),
    WrapStatementsInCondition => ("RR0172", "wrap_statements_in_condition", true, "Wrap in condition"),
    WrapLinesInPreprocessorDirective => ("RR0174", "wrap_lines_in_preprocessor_directive", true, "Wrap in #if"),
    WrapLinesInRegion => ("RR0175", "wrap_lines_in_region", true, "Wrap in region"),
    WrapLinesInTryCatch => ("RR0176", "wrap_lines_in_try_catch", true, "Wrap in try-catch"),
    WrapStatementsInUsingStatement => ("RR0177", "wrap_statements_in_using_statement", true, "Wrap in using statement"),
    AddGenericParameterToDeclaration => ("RR0178", "add_generic_parameter_to_declaration", true, "Add type parameter"),
    ChangeAccessibility => ("RR0186", "change_accessibility", true, "Change accessibility to 'X'"),
    WrapConstraintClauses => ("RR0187", "wrap_constraint_clauses", true, "Wrap constraints"),
    InvertIf => ("RR0189", "invert_if", true, "Invert if"),
    SplitLocalDeclarationAndAssignment => ("RR0194", "split_local_declaration_and_assignment", true, "Split declaration and assignment"),
    UncommentMultiLineComment => ("RR0200", "uncomment_multi_line_comment", true, "Uncomment"),
}

impl RefactoringId {
    /// Accepts either the stable id (`RR0075`) or the config key (`merge_if_statements`).
    pub fn parse(value: &str) -> Option<RefactoringId> {
        let value = value.trim();
        RefactoringId::from_id(&value.to_ascii_uppercase())
            .or_else(|| RefactoringId::from_config_key(value))
    }
}

impl fmt::Display for RefactoringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown refactoring `{0}`")]
pub struct UnknownRefactoring(pub String);

impl FromStr for RefactoringId {
    type Err = UnknownRefactoring;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RefactoringId::parse(s).ok_or_else(|| UnknownRefactoring(s.to_string()))
    }
}

/// Tells the engine which refactorings may register actions.
pub trait RefactoringSettings {
    fn is_enabled(&self, id: RefactoringId) -> bool;

    fn is_any_enabled(&self, ids: &[RefactoringId]) -> bool {
        ids.iter().any(|id| self.is_enabled(*id))
    }
}

/// Catalogue defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSettings;

impl RefactoringSettings for DefaultSettings {
    fn is_enabled(&self, id: RefactoringId) -> bool {
        id.enabled_by_default()
    }
}

/// Everything on, including refactorings that are off by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllEnabled;

impl RefactoringSettings for AllEnabled {
    fn is_enabled(&self, _id: RefactoringId) -> bool {
        true
    }
}

impl<T: RefactoringSettings + ?Sized> RefactoringSettings for &T {
    fn is_enabled(&self, id: RefactoringId) -> bool {
        (**self).is_enabled(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn ids_and_keys_are_unique() {
        let ids: HashSet<_> = RefactoringId::ALL.iter().map(|r| r.id()).collect();
        let keys: HashSet<_> = RefactoringId::ALL.iter().map(|r| r.config_key()).collect();
        assert_eq!(ids.len(), RefactoringId::ALL.len());
        assert_eq!(keys.len(), RefactoringId::ALL.len());
        assert_eq!(RefactoringId::ALL.len(), 53);
    }

    #[test]
    fn parses_ids_and_keys() {
        assert_eq!(RefactoringId::parse("RR0075"), Some(RefactoringId::MergeIfStatements));
        assert_eq!(RefactoringId::parse("rr0075"), Some(RefactoringId::MergeIfStatements));
        assert_eq!(
            "merge_if_statements".parse::<RefactoringId>(),
            Ok(RefactoringId::MergeIfStatements)
        );
        assert!("RR9999".parse::<RefactoringId>().is_err());
    }

    #[test]
    fn defaults() {
        let disabled: Vec<_> = RefactoringId::ALL
            .iter()
            .filter(|id| !DefaultSettings.is_enabled(**id))
            .map(|id| id.id())
            .collect();
        assert_eq!(disabled, vec!["RR0038", "RR0066"]);
    }

    #[test]
    fn serializes_as_stable_id() {
        let json = serde_json::to_string(&RefactoringId::InvertIf).unwrap();
        assert_eq!(json, "\"RR0189\"");
    }
}
