//! Narrow semantic surface consumed by refactorings.
//!
//! Hosts with a real compiler plug in through [`SemanticModelProvider`]. Without one, the
//! [`DeclarationSemanticModel`] answers type questions from the declarations of a single
//! document: locals, parameters, fields, properties, method return types and the type
//! declarations of the file, plus a small table of well-known framework types.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use sharp_syntax::{
    support, AstNode, Expression, FieldDeclaration, LiteralExpression, MemberAccessExpression,
    MethodLike, ParameterList, PropertyLike, SyntaxKind, SyntaxNode, TypeDeclaration,
    VariableDeclaration,
};

use crate::document::Document;

/// Nesting limit for `var` chains and base-type walks.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    TypeParameter,
    Array,
    /// `Nullable<T>` / `T?` over a value type.
    Nullable,
    /// A name the model could not resolve.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialType {
    None,
    Object,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Decimal,
    Single,
    Double,
    String,
    Void,
}

impl SpecialType {
    pub fn from_keyword(kind: SyntaxKind) -> SpecialType {
        match kind {
            SyntaxKind::ObjectKw => SpecialType::Object,
            SyntaxKind::BoolKw => SpecialType::Boolean,
            SyntaxKind::CharKw => SpecialType::Char,
            SyntaxKind::SbyteKw => SpecialType::SByte,
            SyntaxKind::ByteKw => SpecialType::Byte,
            SyntaxKind::ShortKw => SpecialType::Int16,
            SyntaxKind::UshortKw => SpecialType::UInt16,
            SyntaxKind::IntKw => SpecialType::Int32,
            SyntaxKind::UintKw => SpecialType::UInt32,
            SyntaxKind::LongKw => SpecialType::Int64,
            SyntaxKind::UlongKw => SpecialType::UInt64,
            SyntaxKind::DecimalKw => SpecialType::Decimal,
            SyntaxKind::FloatKw => SpecialType::Single,
            SyntaxKind::DoubleKw => SpecialType::Double,
            SyntaxKind::StringKw => SpecialType::String,
            SyntaxKind::VoidKw => SpecialType::Void,
            _ => SpecialType::None,
        }
    }

    /// `String`, `System.Int32`, ...
    pub fn from_framework_name(name: &str) -> SpecialType {
        match name.strip_prefix("System.").unwrap_or(name) {
            "Object" => SpecialType::Object,
            "Boolean" => SpecialType::Boolean,
            "Char" => SpecialType::Char,
            "SByte" => SpecialType::SByte,
            "Byte" => SpecialType::Byte,
            "Int16" => SpecialType::Int16,
            "UInt16" => SpecialType::UInt16,
            "Int32" => SpecialType::Int32,
            "UInt32" => SpecialType::UInt32,
            "Int64" => SpecialType::Int64,
            "UInt64" => SpecialType::UInt64,
            "Decimal" => SpecialType::Decimal,
            "Single" => SpecialType::Single,
            "Double" => SpecialType::Double,
            "String" => SpecialType::String,
            "Void" => SpecialType::Void,
            _ => SpecialType::None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SpecialType::None => "",
            SpecialType::Object => "object",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Decimal => "decimal",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::String => "string",
            SpecialType::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            SpecialType::Char
                | SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
                | SpecialType::Decimal
                | SpecialType::Single
                | SpecialType::Double
        )
    }

    pub fn is_integral(self) -> bool {
        self.is_numeric() && !matches!(self, SpecialType::Decimal | SpecialType::Single | SpecialType::Double)
    }

    pub fn is_value_type(self) -> bool {
        self.is_numeric() || self == SpecialType::Boolean
    }

    /// Whether the language defines an implicit numeric conversion from `self` to `to`.
    pub fn converts_implicitly_to(self, to: SpecialType) -> bool {
        use SpecialType::*;
        if self == to {
            return true;
        }
        let targets: &[SpecialType] = match self {
            SByte => &[Int16, Int32, Int64, Single, Double, Decimal],
            Byte => &[Int16, UInt16, Int32, UInt32, Int64, UInt64, Single, Double, Decimal],
            Int16 => &[Int32, Int64, Single, Double, Decimal],
            UInt16 => &[Int32, UInt32, Int64, UInt64, Single, Double, Decimal],
            Int32 => &[Int64, Single, Double, Decimal],
            UInt32 => &[Int64, UInt64, Single, Double, Decimal],
            Int64 | UInt64 => &[Single, Double, Decimal],
            Char => &[UInt16, Int32, UInt32, Int64, UInt64, Single, Double, Decimal],
            Single => &[Double],
            _ => &[],
        };
        targets.contains(&to)
    }

    fn unary_promotion(self) -> SpecialType {
        match self {
            SpecialType::SByte
            | SpecialType::Byte
            | SpecialType::Int16
            | SpecialType::UInt16
            | SpecialType::Char => SpecialType::Int32,
            other => other,
        }
    }

    fn binary_promotion(self, other: SpecialType) -> Option<SpecialType> {
        use SpecialType::{Decimal, Double, Int32, Int64, Single, UInt32, UInt64};
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }
        let (a, b) = (self.unary_promotion(), other.unary_promotion());
        let has = |t: SpecialType| a == t || b == t;
        Some(if has(Decimal) {
            Decimal
        } else if has(Double) {
            Double
        } else if has(Single) {
            Single
        } else if has(UInt64) {
            UInt64
        } else if has(Int64) || (has(UInt32) && (a == Int32 || b == Int32)) {
            Int64
        } else if has(UInt32) {
            UInt32
        } else {
            Int32
        })
    }
}

/// A resolved type, as far as the model could tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    pub special: SpecialType,
    /// Element type of an array, underlying type of a nullable.
    pub element: Option<Box<TypeSymbol>>,
}

impl TypeSymbol {
    pub fn special(special: SpecialType) -> Self {
        let kind = match special {
            SpecialType::Object | SpecialType::String => TypeKind::Class,
            _ => TypeKind::Struct,
        };
        Self {
            name: special.keyword().to_string(),
            kind,
            special,
            element: None,
        }
    }

    pub fn named(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            special: SpecialType::None,
            element: None,
        }
    }

    pub fn nullable(underlying: TypeSymbol) -> Self {
        Self {
            name: format!("{}?", underlying.name),
            kind: TypeKind::Nullable,
            special: SpecialType::None,
            element: Some(Box::new(underlying)),
        }
    }

    pub fn array(element: TypeSymbol) -> Self {
        Self {
            name: format!("{}[]", element.name),
            kind: TypeKind::Array,
            special: SpecialType::None,
            element: Some(Box::new(element)),
        }
    }

    /// Display name, as it would be written in a cast.
    pub fn display(&self) -> &str {
        &self.name
    }

    pub fn is_string(&self) -> bool {
        self.special == SpecialType::String
    }

    pub fn is_boolean(&self) -> bool {
        self.special == SpecialType::Boolean
    }

    pub fn is_void(&self) -> bool {
        self.special == SpecialType::Void
    }

    pub fn is_numeric(&self) -> bool {
        self.special.is_numeric()
    }

    pub fn is_error(&self) -> bool {
        self.kind == TypeKind::Error
    }

    pub fn is_nullable_value_type(&self) -> bool {
        self.kind == TypeKind::Nullable
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum | TypeKind::Nullable)
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array
        )
    }

    /// Underlying type of a nullable value type.
    pub fn underlying(&self) -> Option<&TypeSymbol> {
        match self.kind {
            TypeKind::Nullable => self.element.as_deref(),
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn element_type(&self) -> Option<&TypeSymbol> {
        match self.kind {
            TypeKind::Array => self.element.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Type information for the nodes of one document.
pub trait SemanticModel {
    /// Type of an expression, parameter or variable declarator.
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol>;

    /// Whether values of `ty` implement `IDisposable`.
    fn is_disposable(&self, ty: &TypeSymbol) -> bool;
}

/// Host hook producing semantic models on demand.
pub trait SemanticModelProvider {
    fn supports_semantic_model(&self) -> bool {
        true
    }

    fn semantic_model(&self, document: &Document) -> Option<Rc<dyn SemanticModel>>;
}

/// Provider backed by [`DeclarationSemanticModel`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationSemanticModelProvider;

impl SemanticModelProvider for DeclarationSemanticModelProvider {
    fn semantic_model(&self, document: &Document) -> Option<Rc<dyn SemanticModel>> {
        Some(Rc::new(DeclarationSemanticModel::new(document)))
    }
}

const KNOWN_DISPOSABLES: &[&str] = &[
    "IDisposable",
    "Stream",
    "FileStream",
    "MemoryStream",
    "StreamReader",
    "StreamWriter",
    "StringReader",
    "StringWriter",
    "TextReader",
    "TextWriter",
    "BinaryReader",
    "BinaryWriter",
    "HttpClient",
    "CancellationTokenSource",
    "Timer",
    "Process",
    "SqlConnection",
    "SqlCommand",
];

const KNOWN_STRUCTS: &[&str] = &[
    "DateTime",
    "DateTimeOffset",
    "TimeSpan",
    "Guid",
    "CancellationToken",
    "KeyValuePair",
    "IntPtr",
];

#[derive(Debug, Clone)]
struct DeclaredType {
    kind: TypeKind,
    bases: Vec<String>,
    node: SyntaxNode,
}

/// Declaration-driven inference over a single document.
#[derive(Debug, Clone)]
pub struct DeclarationSemanticModel {
    types: HashMap<String, DeclaredType>,
}

impl DeclarationSemanticModel {
    pub fn new(document: &Document) -> Self {
        let mut types = HashMap::new();
        for node in document.syntax().descendants() {
            let kind = match node.kind() {
                SyntaxKind::ClassDeclaration => TypeKind::Class,
                SyntaxKind::StructDeclaration => TypeKind::Struct,
                SyntaxKind::InterfaceDeclaration => TypeKind::Interface,
                SyntaxKind::EnumDeclaration => TypeKind::Enum,
                SyntaxKind::DelegateDeclaration => TypeKind::Delegate,
                _ => continue,
            };
            let Some(decl) = TypeDeclaration::cast(node.clone()) else {
                continue;
            };
            let Some(name) = decl.identifier() else {
                continue;
            };
            let bases = decl
                .base_list()
                .map(|list| list.types().map(|ty| simple_type_name(ty.syntax())).collect())
                .unwrap_or_default();
            types.entry(name.text().to_string()).or_insert(DeclaredType {
                kind,
                bases,
                node,
            });
        }
        Self { types }
    }

    /// Type denoted by type syntax (`int?`, `List<T>`, `Foo[]`). `var` has no type.
    pub fn type_from_syntax(&self, ty: &SyntaxNode) -> Option<TypeSymbol> {
        match ty.kind() {
            SyntaxKind::PredefinedType => {
                let keyword = support::token_where(ty, |k| k.is_predefined_type_keyword())?;
                Some(TypeSymbol::special(SpecialType::from_keyword(keyword.kind())))
            }
            SyntaxKind::NullableType => {
                let inner = self.type_from_syntax(&ty.children().find(|n| n.kind().is_type())?)?;
                if inner.is_value_type() {
                    Some(TypeSymbol::nullable(inner))
                } else {
                    Some(inner)
                }
            }
            SyntaxKind::ArrayType => {
                let element = self.type_from_syntax(&ty.children().find(|n| n.kind().is_type())?)?;
                Some(TypeSymbol::array(element))
            }
            SyntaxKind::GenericName => {
                let name = support::ident_token(ty)?;
                let args: Vec<SyntaxNode> = ty
                    .children()
                    .find(|n| n.kind() == SyntaxKind::TypeArgumentList)
                    .map(|list| list.children().filter(|n| n.kind().is_type()).collect())
                    .unwrap_or_default();
                if name.text() == "Nullable" && args.len() == 1 {
                    let inner = self.type_from_syntax(&args[0])?;
                    return Some(TypeSymbol::nullable(inner));
                }
                let kind = self.named_kind(name.text(), ty);
                Some(TypeSymbol::named(compact_text(ty), kind))
            }
            SyntaxKind::IdentifierName | SyntaxKind::QualifiedName => {
                let name = simple_type_name(ty);
                if ty.kind() == SyntaxKind::IdentifierName && matches!(name.as_str(), "var" | "dynamic") {
                    return None;
                }
                let special = SpecialType::from_framework_name(&name);
                if special != SpecialType::None {
                    return Some(TypeSymbol {
                        name: compact_text(ty),
                        ..TypeSymbol::special(special)
                    });
                }
                let kind = self.named_kind(&name, ty);
                Some(TypeSymbol::named(compact_text(ty), kind))
            }
            _ => None,
        }
    }

    fn named_kind(&self, name: &str, context: &SyntaxNode) -> TypeKind {
        if let Some(declared) = self.types.get(name) {
            return declared.kind;
        }
        if is_type_parameter_in_scope(name, context) {
            return TypeKind::TypeParameter;
        }
        if KNOWN_STRUCTS.contains(&name) {
            return TypeKind::Struct;
        }
        if name.len() > 1
            && name.starts_with('I')
            && name[1..].starts_with(|c: char| c.is_ascii_uppercase())
        {
            return TypeKind::Interface;
        }
        if KNOWN_DISPOSABLES.contains(&name)
            || matches!(
                name,
                "List" | "Dictionary" | "HashSet" | "Queue" | "Stack" | "StringBuilder"
                    | "Exception" | "Task" | "Type" | "Uri" | "Regex"
            )
        {
            return TypeKind::Class;
        }
        TypeKind::Error
    }

    fn infer(&self, node: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        if depth > MAX_DEPTH {
            return None;
        }
        match node.kind() {
            SyntaxKind::Parameter => {
                let ty = node.children().find(|n| n.kind().is_type())?;
                self.type_from_syntax(&ty)
            }
            SyntaxKind::VariableDeclarator => self.declarator_type(node, depth),
            SyntaxKind::LiteralExpression => literal_type(&LiteralExpression::cast(node.clone())?),
            SyntaxKind::InterpolatedStringExpression => {
                Some(TypeSymbol::special(SpecialType::String))
            }
            SyntaxKind::ParenthesizedExpression => self.infer(&node.children().next()?, depth + 1),
            SyntaxKind::CastExpression
            | SyntaxKind::ObjectCreationExpression
            | SyntaxKind::DefaultExpression => {
                let ty = node.children().find(|n| n.kind().is_type())?;
                self.type_from_syntax(&ty)
            }
            SyntaxKind::ArrayCreationExpression => {
                let ty = node.children().find(|n| n.kind() == SyntaxKind::ArrayType)?;
                let element = ty.children().find(|n| n.kind().is_type())?;
                Some(TypeSymbol::array(self.type_from_syntax(&element)?))
            }
            SyntaxKind::ThisExpression => {
                let decl = node.ancestors().find_map(TypeDeclaration::cast)?;
                let name = decl.identifier()?;
                Some(TypeSymbol::named(name.text(), self.named_kind(name.text(), node)))
            }
            SyntaxKind::TypeOfExpression => Some(TypeSymbol::named("Type", TypeKind::Class)),
            SyntaxKind::IsPatternExpression => Some(TypeSymbol::special(SpecialType::Boolean)),
            SyntaxKind::BinaryExpression => self.binary_type(node, depth),
            SyntaxKind::PrefixUnaryExpression => {
                let op = support::token_where(node, |k| !k.is_trivia())?.kind();
                let operand = self.infer(&node.children().next()?, depth + 1);
                match op {
                    SyntaxKind::Bang => Some(TypeSymbol::special(SpecialType::Boolean)),
                    SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => operand,
                    SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::Tilde => {
                        let operand = operand?;
                        if operand.is_numeric() {
                            Some(TypeSymbol::special(operand.special.unary_promotion()))
                        } else {
                            Some(operand)
                        }
                    }
                    _ => None,
                }
            }
            SyntaxKind::PostfixUnaryExpression => self.infer(&node.children().next()?, depth + 1),
            SyntaxKind::ConditionalExpression => {
                let mut branches = node.children().filter(|n| n.kind().is_expression()).skip(1);
                let when_true = branches.next()?;
                let when_false = branches.next();
                self.infer(&when_true, depth + 1)
                    .or_else(|| when_false.and_then(|n| self.infer(&n, depth + 1)))
            }
            SyntaxKind::AssignmentExpression => self.infer(&node.children().next()?, depth + 1),
            SyntaxKind::MemberAccessExpression | SyntaxKind::ConditionalAccessExpression => {
                self.member_access_type(node, depth)
            }
            SyntaxKind::InvocationExpression => self.invocation_type(node, depth),
            SyntaxKind::ElementAccessExpression => {
                let receiver = self.infer(&node.children().next()?, depth + 1)?;
                if receiver.is_string() {
                    return Some(TypeSymbol::special(SpecialType::Char));
                }
                receiver.element_type().cloned()
            }
            SyntaxKind::IdentifierName => {
                let name = support::ident_token(node)?;
                self.resolve_value(name.text(), node, depth)
            }
            _ => None,
        }
    }

    fn declarator_type(&self, declarator: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        let declaration = declarator.parent().and_then(VariableDeclaration::cast)?;
        let ty = declaration.ty()?;
        match self.type_from_syntax(ty.syntax()) {
            Some(ty) => Some(ty),
            None if compact_text(ty.syntax()) == "var" => {
                let value = declarator
                    .children()
                    .find(|n| n.kind() == SyntaxKind::EqualsValueClause)?
                    .children()
                    .find(|n| n.kind().is_expression())?;
                self.infer(&value, depth + 1)
            }
            None => None,
        }
    }

    fn binary_type(&self, node: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        let op = support::token_where(node, |k| !k.is_trivia())?.kind();
        let mut operands = node.children().filter(|n| n.kind().is_expression());
        let left = operands.next()?;
        let right = operands.next()?;
        match op {
            SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Less
            | SyntaxKind::LessEq
            | SyntaxKind::Greater
            | SyntaxKind::GreaterEq
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::IsKw => Some(TypeSymbol::special(SpecialType::Boolean)),
            SyntaxKind::AsKw => self.type_from_syntax(&right),
            SyntaxKind::QuestionQuestion => {
                let left = self.infer(&left, depth + 1);
                match left {
                    Some(ty) if ty.is_nullable_value_type() => ty.underlying().cloned(),
                    Some(ty) => Some(ty),
                    None => self.infer(&right, depth + 1),
                }
            }
            _ => {
                let left = self.infer(&left, depth + 1);
                let right = self.infer(&right, depth + 1);
                if op == SyntaxKind::Plus
                    && (left.as_ref().is_some_and(TypeSymbol::is_string)
                        || right.as_ref().is_some_and(TypeSymbol::is_string))
                {
                    return Some(TypeSymbol::special(SpecialType::String));
                }
                let (left, right) = (left?, right?);
                if matches!(op, SyntaxKind::Amp | SyntaxKind::Pipe | SyntaxKind::Caret)
                    && left.is_boolean()
                    && right.is_boolean()
                {
                    return Some(left);
                }
                if matches!(op, SyntaxKind::LeftShift | SyntaxKind::RightShift) {
                    return left
                        .is_numeric()
                        .then(|| TypeSymbol::special(left.special.unary_promotion()));
                }
                left.special
                    .binary_promotion(right.special)
                    .map(TypeSymbol::special)
            }
        }
    }

    fn member_access_type(&self, node: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        let access = MemberAccessExpression::cast(node.clone())?;
        let name = access.name_text()?;
        let receiver_node = access.expression()?;

        // `Color.Red`, `String.Empty`: the receiver names a type.
        if receiver_node.kind() == SyntaxKind::IdentifierName
            || receiver_node.kind() == SyntaxKind::PredefinedType
        {
            let receiver_name = simple_type_name(receiver_node.syntax());
            let is_value = receiver_node.kind() == SyntaxKind::IdentifierName
                && self
                    .resolve_value(&receiver_name, receiver_node.syntax(), depth + 1)
                    .is_some();
            if !is_value {
                if let Some(declared) = self.types.get(&receiver_name) {
                    if declared.kind == TypeKind::Enum {
                        return Some(TypeSymbol::named(receiver_name, TypeKind::Enum));
                    }
                    return self.member_type(&declared.node, &name, false, depth + 1);
                }
                let special = match receiver_node.kind() {
                    SyntaxKind::PredefinedType => support::token_where(receiver_node.syntax(), |k| {
                        k.is_predefined_type_keyword()
                    })
                    .map_or(SpecialType::None, |t| SpecialType::from_keyword(t.kind())),
                    _ => SpecialType::from_framework_name(&receiver_name),
                };
                if special == SpecialType::String && name == "Empty" {
                    return Some(TypeSymbol::special(SpecialType::String));
                }
                if special != SpecialType::None {
                    return None;
                }
            }
        }

        let receiver = self.infer(receiver_node.syntax(), depth + 1)?;
        match (name.as_str(), receiver.kind) {
            ("HasValue", TypeKind::Nullable) => Some(TypeSymbol::special(SpecialType::Boolean)),
            ("Value", TypeKind::Nullable) => receiver.underlying().cloned(),
            ("Length", TypeKind::Array) => Some(TypeSymbol::special(SpecialType::Int32)),
            ("Length", _) if receiver.is_string() => Some(TypeSymbol::special(SpecialType::Int32)),
            _ => {
                let declared = self.types.get(base_name(&receiver.name))?;
                self.member_type(&declared.node, &name, false, depth + 1)
            }
        }
    }

    fn invocation_type(&self, node: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        let callee = node.children().next()?;
        match callee.kind() {
            SyntaxKind::IdentifierName | SyntaxKind::GenericName => {
                let name = support::ident_token(&callee)?;
                for ancestor in node.ancestors() {
                    if matches!(ancestor.kind(), SyntaxKind::Block | SyntaxKind::SwitchSection) {
                        for function in ancestor.children().filter_map(MethodLike::cast) {
                            if function.identifier().is_some_and(|id| id.text() == name.text()) {
                                return self.type_from_syntax(function.return_type()?.syntax());
                            }
                        }
                    }
                    if ancestor.kind().is_type_declaration() {
                        if let Some(ty) = self.member_type(&ancestor, name.text(), true, depth + 1) {
                            return Some(ty);
                        }
                    }
                }
                None
            }
            SyntaxKind::MemberAccessExpression | SyntaxKind::ConditionalAccessExpression => {
                let access = MemberAccessExpression::cast(callee)?;
                let name = access.name_text()?;
                match name.as_str() {
                    "ToString" => return Some(TypeSymbol::special(SpecialType::String)),
                    "Equals" | "ReferenceEquals" => {
                        return Some(TypeSymbol::special(SpecialType::Boolean))
                    }
                    "GetHashCode" => return Some(TypeSymbol::special(SpecialType::Int32)),
                    _ => {}
                }
                let receiver = access.expression()?;
                let receiver_name = simple_type_name(receiver.syntax());
                let declared = match self.types.get(&receiver_name) {
                    Some(declared)
                        if self
                            .resolve_value(&receiver_name, receiver.syntax(), depth + 1)
                            .is_none() =>
                    {
                        declared
                    }
                    _ => {
                        let ty = self.infer(receiver.syntax(), depth + 1)?;
                        self.types.get(base_name(&ty.name))?
                    }
                };
                self.member_type(&declared.node, &name, true, depth + 1)
            }
            _ => None,
        }
    }

    /// Field/property type (or method return type when `method`) of a member declared in
    /// `type_node` or one of its declared base types.
    fn member_type(
        &self,
        type_node: &SyntaxNode,
        name: &str,
        method: bool,
        depth: usize,
    ) -> Option<TypeSymbol> {
        if depth > MAX_DEPTH {
            return None;
        }
        let decl = TypeDeclaration::cast(type_node.clone())?;
        for member in decl.members() {
            let syntax = member.syntax();
            if method {
                if let Some(function) = MethodLike::cast(syntax.clone()) {
                    if function.kind() == SyntaxKind::MethodDeclaration
                        && function.identifier().is_some_and(|id| id.text() == name)
                    {
                        return self.type_from_syntax(function.return_type()?.syntax());
                    }
                }
                continue;
            }
            if let Some(field) = FieldDeclaration::cast(syntax.clone()) {
                let Some(declaration) = field.declaration() else {
                    continue;
                };
                if declaration
                    .declarators()
                    .any(|d| d.identifier().is_some_and(|id| id.text() == name))
                {
                    return self.type_from_syntax(declaration.ty()?.syntax());
                }
            } else if let Some(property) = PropertyLike::cast(syntax.clone()) {
                if property.identifier().is_some_and(|id| id.text() == name) {
                    return self.type_from_syntax(property.ty()?.syntax());
                }
            }
        }
        let bases = decl
            .base_list()
            .map(|list| list.types().map(|ty| simple_type_name(ty.syntax())).collect::<Vec<_>>())
            .unwrap_or_default();
        bases.iter().find_map(|base| {
            let declared = self.types.get(base)?;
            self.member_type(&declared.node, name, method, depth + 1)
        })
    }

    /// Type of the local, parameter, field or property `name` visible at `at`.
    fn resolve_value(&self, name: &str, at: &SyntaxNode, depth: usize) -> Option<TypeSymbol> {
        let position = u32::from(at.text_range().start());
        for ancestor in at.ancestors().skip(1) {
            match ancestor.kind() {
                SyntaxKind::Block | SyntaxKind::SwitchSection => {
                    for statement in ancestor.children() {
                        if u32::from(statement.text_range().end()) > position {
                            break;
                        }
                        if statement.kind() != SyntaxKind::LocalDeclarationStatement {
                            continue;
                        }
                        if let Some(found) = self.find_in_declaration(&statement, name, depth) {
                            return found;
                        }
                    }
                }
                SyntaxKind::ForStatement | SyntaxKind::UsingStatement => {
                    if let Some(found) = self.find_in_declaration(&ancestor, name, depth) {
                        return found;
                    }
                }
                SyntaxKind::ForEachStatement => {
                    if support::ident_token(&ancestor).is_some_and(|id| id.text() == name) {
                        let ty = ancestor.children().find(|n| n.kind().is_type())?;
                        if let Some(ty) = self.type_from_syntax(&ty) {
                            return Some(ty);
                        }
                        let collection = ancestor
                            .children()
                            .filter(|n| n.kind().is_expression())
                            .nth(1)?;
                        return self
                            .infer(&collection, depth + 1)
                            .and_then(|c| c.element_type().cloned());
                    }
                }
                SyntaxKind::CatchClause => {
                    let declaration = ancestor
                        .children()
                        .find(|n| n.kind() == SyntaxKind::CatchDeclaration);
                    if let Some(declaration) = declaration {
                        if support::ident_token(&declaration).is_some_and(|id| id.text() == name) {
                            let ty = declaration.children().find(|n| n.kind().is_type())?;
                            return self.type_from_syntax(&ty);
                        }
                    }
                }
                SyntaxKind::IfStatement | SyntaxKind::WhileStatement => {
                    let condition = ancestor.children().find(|n| n.kind().is_expression());
                    let pattern = condition.into_iter().flat_map(|c| c.descendants()).find(|n| {
                        n.kind() == SyntaxKind::DeclarationPattern
                            && support::ident_token(n).is_some_and(|id| id.text() == name)
                    });
                    if let Some(pattern) = pattern {
                        let ty = pattern.children().find(|n| n.kind().is_type())?;
                        return self.type_from_syntax(&ty);
                    }
                }
                SyntaxKind::SimpleLambdaExpression => {
                    let parameter = ancestor.children().find(|n| n.kind() == SyntaxKind::Parameter)?;
                    if support::ident_token(&parameter).is_some_and(|id| id.text() == name) {
                        return self.infer(&parameter, depth + 1);
                    }
                }
                kind if kind.is_lambda()
                    || kind == SyntaxKind::IndexerDeclaration
                    || MethodLike::can_cast(kind) =>
                {
                    let parameters = ancestor.children().find_map(ParameterList::cast);
                    if let Some(parameter) = parameters.and_then(|list| {
                        list.parameters()
                            .find(|p| p.identifier().is_some_and(|id| id.text() == name))
                    }) {
                        return self.infer(parameter.syntax(), depth + 1);
                    }
                }
                kind if kind.is_type_declaration() => {
                    if let Some(ty) = self.member_type(&ancestor, name, false, depth + 1) {
                        return Some(ty);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// `Some(ty)` when `container` declares `name` directly (in a child variable
    /// declaration); the inner option is the declared type.
    fn find_in_declaration(
        &self,
        container: &SyntaxNode,
        name: &str,
        depth: usize,
    ) -> Option<Option<TypeSymbol>> {
        let declaration = container.children().find_map(VariableDeclaration::cast)?;
        let declarator = declaration
            .declarators()
            .find(|d| d.identifier().is_some_and(|id| id.text() == name))?;
        Some(self.declarator_type(declarator.syntax(), depth + 1))
    }

    fn is_disposable_name(&self, name: &str, visited: &mut HashSet<String>) -> bool {
        if KNOWN_DISPOSABLES.contains(&name) {
            return true;
        }
        if !visited.insert(name.to_string()) {
            return false;
        }
        self.types.get(name).is_some_and(|declared| {
            declared
                .bases
                .iter()
                .any(|base| self.is_disposable_name(base, visited))
        })
    }
}

impl SemanticModel for DeclarationSemanticModel {
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol> {
        if node.kind().is_type() && !is_value_position(node) {
            return self.type_from_syntax(node);
        }
        self.infer(node, 0)
    }

    fn is_disposable(&self, ty: &TypeSymbol) -> bool {
        if !ty.is_reference_type() && !ty.is_value_type() {
            return false;
        }
        self.is_disposable_name(base_name(&ty.name), &mut HashSet::new())
    }
}

/// True when a type-shaped node (`IdentifierName`, ...) is used as a value.
fn is_value_position(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    match parent.kind() {
        SyntaxKind::VariableDeclaration
        | SyntaxKind::Parameter
        | SyntaxKind::CastExpression
        | SyntaxKind::ObjectCreationExpression
        | SyntaxKind::ArrayType
        | SyntaxKind::NullableType
        | SyntaxKind::TypeArgumentList
        | SyntaxKind::BaseList
        | SyntaxKind::PropertyDeclaration
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::DelegateDeclaration
        | SyntaxKind::TypeOfExpression
        | SyntaxKind::DefaultExpression
        | SyntaxKind::DeclarationPattern
        | SyntaxKind::CatchDeclaration
        | SyntaxKind::QualifiedName => false,
        SyntaxKind::BinaryExpression => {
            // Right operand of `is`/`as`.
            let op = support::token_where(&parent, |k| !k.is_trivia()).map(|t| t.kind());
            !(matches!(op, Some(SyntaxKind::IsKw | SyntaxKind::AsKw))
                && parent.children().nth(1).as_ref() == Some(node))
        }
        _ => true,
    }
}

fn literal_type(literal: &LiteralExpression) -> Option<TypeSymbol> {
    let token = literal.token()?;
    let special = match token.kind() {
        SyntaxKind::NumericLiteral => numeric_literal_type(token.text()),
        SyntaxKind::CharLiteral => SpecialType::Char,
        SyntaxKind::StringLiteral | SyntaxKind::VerbatimStringLiteral => SpecialType::String,
        SyntaxKind::TrueKw | SyntaxKind::FalseKw => SpecialType::Boolean,
        _ => return None,
    };
    Some(TypeSymbol::special(special))
}

pub(crate) fn numeric_literal_type(text: &str) -> SpecialType {
    let text = text.to_ascii_lowercase().replace('_', "");
    let is_hex = text.starts_with("0x") || text.starts_with("0b");
    if text.ends_with("ul") || text.ends_with("lu") {
        return SpecialType::UInt64;
    }
    if text.ends_with('u') {
        return SpecialType::UInt32;
    }
    if text.ends_with('l') {
        return SpecialType::Int64;
    }
    if is_hex {
        return SpecialType::Int32;
    }
    if text.ends_with('m') {
        SpecialType::Decimal
    } else if text.ends_with('f') {
        SpecialType::Single
    } else if text.ends_with('d') || text.contains('.') || text.contains('e') {
        SpecialType::Double
    } else {
        SpecialType::Int32
    }
}

fn is_type_parameter_in_scope(name: &str, context: &SyntaxNode) -> bool {
    context.ancestors().any(|ancestor| {
        ancestor
            .children()
            .filter(|n| n.kind() == SyntaxKind::TypeParameterList)
            .flat_map(|list| list.children())
            .any(|parameter| support::ident_token(&parameter).is_some_and(|id| id.text() == name))
    })
}

/// Last identifier of a (qualified, generic) name.
fn simple_type_name(node: &SyntaxNode) -> String {
    match node.kind() {
        SyntaxKind::QualifiedName => node
            .children()
            .last()
            .map(|last| simple_type_name(&last))
            .unwrap_or_default(),
        SyntaxKind::IdentifierName | SyntaxKind::GenericName => support::ident_token(node)
            .map(|t| t.text().to_string())
            .unwrap_or_default(),
        _ => compact_text(node),
    }
}

/// `List<int>` → `List`.
fn base_name(display: &str) -> &str {
    let end = display.find(['<', '[', '?']).unwrap_or(display.len());
    let name = &display[..end];
    name.rsplit('.').next().unwrap_or(name)
}

/// Node text without trivia.
fn compact_text(node: &SyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
        .collect::<Vec<_>>()
        .join("")
        .replace(',', ", ")
}

/// Type of `expression` through the model, when there is one.
pub(crate) fn type_of_expression(
    model: &dyn SemanticModel,
    expression: &Expression,
) -> Option<TypeSymbol> {
    model.type_of(expression.syntax())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model_and_doc(text: &str) -> (DeclarationSemanticModel, Document) {
        let doc = Document::new("Test.cs", text);
        (DeclarationSemanticModel::new(&doc), doc)
    }

    fn expr(doc: &Document, text: &str) -> SyntaxNode {
        doc.syntax()
            .descendants()
            .filter(|n| n.kind().is_expression())
            .find(|n| n.text().to_string() == text)
            .unwrap_or_else(|| panic!("no expression {text:?}"))
    }

    fn type_name(model: &DeclarationSemanticModel, doc: &Document, text: &str) -> Option<String> {
        model.type_of(&expr(doc, text)).map(|t| t.name)
    }

    #[test]
    fn literals_and_operators() {
        let (model, doc) = model_and_doc(
            "class C { void M() { var a = 1L + 2; var b = 1.5f * 2; var c = \"x\" + 1; var d = a > 3; } }",
        );
        assert_eq!(type_name(&model, &doc, "1L + 2").as_deref(), Some("long"));
        assert_eq!(type_name(&model, &doc, "1.5f * 2").as_deref(), Some("float"));
        assert_eq!(type_name(&model, &doc, "\"x\" + 1").as_deref(), Some("string"));
        assert_eq!(type_name(&model, &doc, "a > 3").as_deref(), Some("bool"));
    }

    #[test]
    fn locals_parameters_and_members() {
        let (model, doc) = model_and_doc(
            "class C { string _name; int? Count { get; set; } void M(Foo foo) { var copy = foo; int? n = Count; Use(_name, copy, n.HasValue, n.Value); } } class Foo { }",
        );
        assert_eq!(type_name(&model, &doc, "_name").as_deref(), Some("string"));
        assert_eq!(type_name(&model, &doc, "copy").as_deref(), Some("Foo"));
        let copy = model.type_of(&expr(&doc, "copy")).unwrap();
        assert!(copy.is_reference_type());
        let n = model.type_of(&expr(&doc, "Count")).unwrap();
        assert!(n.is_nullable_value_type());
        assert_eq!(type_name(&model, &doc, "n.HasValue").as_deref(), Some("bool"));
        assert_eq!(type_name(&model, &doc, "n.Value").as_deref(), Some("int"));
    }

    #[test]
    fn method_return_types() {
        let (model, doc) = model_and_doc(
            "class C { Bar Create() => null; void M() { var b = Create(); var s = b.ToString(); } } class Bar { }",
        );
        assert_eq!(type_name(&model, &doc, "Create()").as_deref(), Some("Bar"));
        assert_eq!(type_name(&model, &doc, "b.ToString()").as_deref(), Some("string"));
    }

    #[test]
    fn disposables() {
        let (model, _doc) = model_and_doc(
            "class Resource : IDisposable { } class Derived : Resource { } class Plain { }",
        );
        assert!(model.is_disposable(&TypeSymbol::named("Derived", TypeKind::Class)));
        assert!(model.is_disposable(&TypeSymbol::named("StreamReader", TypeKind::Class)));
        assert!(!model.is_disposable(&TypeSymbol::named("Plain", TypeKind::Class)));
    }

    #[test]
    fn numeric_conversions() {
        assert!(SpecialType::Int32.converts_implicitly_to(SpecialType::Int64));
        assert!(!SpecialType::Int64.converts_implicitly_to(SpecialType::Int32));
        assert!(!SpecialType::Double.converts_implicitly_to(SpecialType::Single));
        assert_eq!(numeric_literal_type("0xFF"), SpecialType::Int32);
        assert_eq!(numeric_literal_type("1e3"), SpecialType::Double);
        assert_eq!(numeric_literal_type("10UL"), SpecialType::UInt64);
    }

    #[test]
    fn binary_promotion_of_numeric_operands() {
        assert_eq!(
            SpecialType::Byte.binary_promotion(SpecialType::Int16),
            Some(SpecialType::Int32)
        );
        assert_eq!(
            SpecialType::UInt32.binary_promotion(SpecialType::Int32),
            Some(SpecialType::Int64)
        );
        assert_eq!(SpecialType::String.binary_promotion(SpecialType::Int32), None);
    }
}
