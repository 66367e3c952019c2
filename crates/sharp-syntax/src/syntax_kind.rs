use rowan::Language;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Unified syntax kind for tokens, trivia and nodes.
///
/// Contextual keywords (`var`, `async`, `where`, `get`, ...) are lexed as
/// [`SyntaxKind::Identifier`] and re-tagged by the parser when they are used as keywords.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
    DocComment,

    // Preprocessor directives: one token per directive line, newline excluded.
    RegionDirective,
    EndRegionDirective,
    IfDirective,
    ElifDirective,
    ElseDirective,
    EndIfDirective,
    DefineDirective,
    UndefDirective,
    PragmaDirective,
    OtherDirective,

    // --- Identifiers & literals ---
    Identifier,
    NumericLiteral,
    CharLiteral,
    StringLiteral,
    VerbatimStringLiteral,
    InterpolatedStringLiteral,
    VerbatimInterpolatedStringLiteral,

    // --- Keywords (reserved) ---
    AbstractKw,
    AsKw,
    BaseKw,
    BoolKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    CheckedKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DecimalKw,
    DefaultKw,
    DelegateKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    EventKw,
    ExplicitKw,
    ExternKw,
    FalseKw,
    FinallyKw,
    FixedKw,
    FloatKw,
    ForKw,
    ForeachKw,
    GotoKw,
    IfKw,
    ImplicitKw,
    InKw,
    IntKw,
    InterfaceKw,
    InternalKw,
    IsKw,
    LockKw,
    LongKw,
    NamespaceKw,
    NewKw,
    NullKw,
    ObjectKw,
    OperatorKw,
    OutKw,
    OverrideKw,
    ParamsKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    RefKw,
    ReturnKw,
    SbyteKw,
    SealedKw,
    ShortKw,
    SizeofKw,
    StackallocKw,
    StaticKw,
    StringKw,
    StructKw,
    SwitchKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypeofKw,
    UintKw,
    UlongKw,
    UncheckedKw,
    UnsafeKw,
    UshortKw,
    UsingKw,
    VirtualKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // --- Contextual keywords (only produced by the parser) ---
    AsyncKw,
    AwaitKw,
    PartialKw,
    GetKw,
    SetKw,
    InitKw,
    AddKw,
    RemoveKw,
    WhereKw,
    YieldKw,
    WhenKw,
    NotKw,

    // --- Operators / punctuation ---
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    ColonColon,
    Question,
    QuestionDot,
    QuestionQuestion,
    QuestionQuestionEq,
    FatArrow,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,

    Eq,
    EqEq,
    BangEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LeftShift,
    LeftShiftEq,
    /// Only produced by the parser (the lexer never joins `>` `>`).
    RightShift,
    /// Only produced by the parser (`>` followed by `>=`).
    RightShiftEq,

    // --- Special ---
    Error,
    Eof,

    // --- Nodes: compilation unit & declarations ---
    CompilationUnit,
    UsingDirective,
    NameEquals,
    NameColon,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    DelegateDeclaration,
    EnumMemberDeclaration,
    FieldDeclaration,
    EventFieldDeclaration,
    EventDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    DestructorDeclaration,
    OperatorDeclaration,
    ConversionOperatorDeclaration,
    IncompleteMember,

    ModifierList,
    AttributeList,
    AttributeTargetSpecifier,
    Attribute,
    AttributeArgumentList,
    AttributeArgument,
    BaseList,
    TypeParameterList,
    TypeParameter,
    TypeParameterConstraintClause,
    TypeConstraint,
    ClassOrStructConstraint,
    ConstructorConstraint,
    ParameterList,
    BracketedParameterList,
    Parameter,
    EqualsValueClause,
    ArrowExpressionClause,
    AccessorList,
    AccessorDeclaration,
    ConstructorInitializer,

    // --- Nodes: statements ---
    Block,
    LocalDeclarationStatement,
    VariableDeclaration,
    VariableDeclarator,
    LocalFunctionStatement,
    ExpressionStatement,
    EmptyStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    DefaultSwitchLabel,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,
    UsingStatement,
    LockStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    GotoStatement,
    YieldReturnStatement,
    YieldBreakStatement,
    LabeledStatement,
    CheckedStatement,
    UnsafeStatement,

    // --- Nodes: types ---
    PredefinedType,
    IdentifierName,
    GenericName,
    TypeArgumentList,
    QualifiedName,
    NullableType,
    ArrayType,
    ArrayRankSpecifier,

    // --- Nodes: expressions ---
    LiteralExpression,
    InterpolatedStringExpression,
    ThisExpression,
    BaseExpression,
    ParenthesizedExpression,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    ArrayCreationExpression,
    ImplicitArrayCreationExpression,
    AnonymousObjectCreationExpression,
    AnonymousObjectMemberDeclarator,
    InitializerExpression,
    InvocationExpression,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    MemberAccessExpression,
    ConditionalAccessExpression,
    ElementAccessExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    AwaitExpression,
    CastExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    IsPatternExpression,
    ConstantPattern,
    DeclarationPattern,
    NotPattern,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,
    AnonymousMethodExpression,
    TypeOfExpression,
    DefaultExpression,
    ThrowExpression,
    DeclarationExpression,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::Newline
                | SyntaxKind::SingleLineComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::DocComment
        ) || self.is_directive()
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment | SyntaxKind::DocComment
        )
    }

    pub fn is_whitespace(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Newline)
    }

    pub fn is_directive(self) -> bool {
        matches!(
            self,
            SyntaxKind::RegionDirective
                | SyntaxKind::EndRegionDirective
                | SyntaxKind::IfDirective
                | SyntaxKind::ElifDirective
                | SyntaxKind::ElseDirective
                | SyntaxKind::EndIfDirective
                | SyntaxKind::DefineDirective
                | SyntaxKind::UndefDirective
                | SyntaxKind::PragmaDirective
                | SyntaxKind::OtherDirective
        )
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AbstractKw as u16..=SyntaxKind::NotKw as u16).contains(&(self as u16))
    }

    pub fn is_contextual_keyword(self) -> bool {
        (SyntaxKind::AsyncKw as u16..=SyntaxKind::NotKw as u16).contains(&(self as u16))
    }

    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier || self.is_contextual_keyword()
    }

    pub fn is_string_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral | SyntaxKind::VerbatimStringLiteral
        )
    }

    pub fn is_interpolated_string_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::InterpolatedStringLiteral | SyntaxKind::VerbatimInterpolatedStringLiteral
        )
    }

    pub fn is_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::VerbatimStringLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
                | SyntaxKind::DefaultKw
        )
    }

    pub fn is_predefined_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::BoolKw
                | SyntaxKind::ByteKw
                | SyntaxKind::SbyteKw
                | SyntaxKind::CharKw
                | SyntaxKind::DecimalKw
                | SyntaxKind::DoubleKw
                | SyntaxKind::FloatKw
                | SyntaxKind::IntKw
                | SyntaxKind::UintKw
                | SyntaxKind::LongKw
                | SyntaxKind::UlongKw
                | SyntaxKind::ShortKw
                | SyntaxKind::UshortKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::StringKw
                | SyntaxKind::VoidKw
        )
    }

    pub fn is_accessibility_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
        )
    }

    /// Keywords accepted in a member's modifier list.
    pub fn is_member_modifier(self) -> bool {
        self.is_accessibility_modifier()
            || matches!(
                self,
                SyntaxKind::NewKw
                    | SyntaxKind::ConstKw
                    | SyntaxKind::StaticKw
                    | SyntaxKind::VirtualKw
                    | SyntaxKind::SealedKw
                    | SyntaxKind::OverrideKw
                    | SyntaxKind::AbstractKw
                    | SyntaxKind::ExternKw
                    | SyntaxKind::UnsafeKw
                    | SyntaxKind::ReadonlyKw
                    | SyntaxKind::VolatileKw
                    | SyntaxKind::AsyncKw
                    | SyntaxKind::PartialKw
            )
    }

    pub fn is_parameter_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::RefKw
                | SyntaxKind::OutKw
                | SyntaxKind::InKw
                | SyntaxKind::ParamsKw
                | SyntaxKind::ThisKw
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AmpEq
                | SyntaxKind::PipeEq
                | SyntaxKind::CaretEq
                | SyntaxKind::LeftShiftEq
                | SyntaxKind::RightShiftEq
                | SyntaxKind::QuestionQuestionEq
        )
    }

    /// For a compound assignment operator, the binary operator it applies.
    pub fn compound_assignment_operator(self) -> Option<SyntaxKind> {
        Some(match self {
            SyntaxKind::PlusEq => SyntaxKind::Plus,
            SyntaxKind::MinusEq => SyntaxKind::Minus,
            SyntaxKind::StarEq => SyntaxKind::Star,
            SyntaxKind::SlashEq => SyntaxKind::Slash,
            SyntaxKind::PercentEq => SyntaxKind::Percent,
            SyntaxKind::AmpEq => SyntaxKind::Amp,
            SyntaxKind::PipeEq => SyntaxKind::Pipe,
            SyntaxKind::CaretEq => SyntaxKind::Caret,
            SyntaxKind::LeftShiftEq => SyntaxKind::LeftShift,
            SyntaxKind::RightShiftEq => SyntaxKind::RightShift,
            SyntaxKind::QuestionQuestionEq => SyntaxKind::QuestionQuestion,
            _ => return None,
        })
    }

    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::DelegateDeclaration
        )
    }

    pub fn is_member_declaration(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                SyntaxKind::NamespaceDeclaration
                    | SyntaxKind::FileScopedNamespaceDeclaration
                    | SyntaxKind::EnumMemberDeclaration
                    | SyntaxKind::FieldDeclaration
                    | SyntaxKind::EventFieldDeclaration
                    | SyntaxKind::EventDeclaration
                    | SyntaxKind::PropertyDeclaration
                    | SyntaxKind::IndexerDeclaration
                    | SyntaxKind::MethodDeclaration
                    | SyntaxKind::ConstructorDeclaration
                    | SyntaxKind::DestructorDeclaration
                    | SyntaxKind::OperatorDeclaration
                    | SyntaxKind::ConversionOperatorDeclaration
                    | SyntaxKind::IncompleteMember
            )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::LocalFunctionStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::EmptyStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::SwitchStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForEachStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::UsingStatement
                | SyntaxKind::LockStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::GotoStatement
                | SyntaxKind::YieldReturnStatement
                | SyntaxKind::YieldBreakStatement
                | SyntaxKind::LabeledStatement
                | SyntaxKind::CheckedStatement
                | SyntaxKind::UnsafeStatement
        )
    }

    pub fn is_jump_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::ReturnStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::GotoStatement
                | SyntaxKind::YieldBreakStatement
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::PredefinedType
                | SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::NullableType
                | SyntaxKind::ArrayType
        )
    }

    /// Expression node kinds. Type syntax counts as expression syntax, as in the
    /// reference compiler's object model.
    pub fn is_expression(self) -> bool {
        self.is_type()
            || matches!(
                self,
                SyntaxKind::LiteralExpression
                    | SyntaxKind::InterpolatedStringExpression
                    | SyntaxKind::ThisExpression
                    | SyntaxKind::BaseExpression
                    | SyntaxKind::ParenthesizedExpression
                    | SyntaxKind::ObjectCreationExpression
                    | SyntaxKind::ImplicitObjectCreationExpression
                    | SyntaxKind::ArrayCreationExpression
                    | SyntaxKind::ImplicitArrayCreationExpression
                    | SyntaxKind::AnonymousObjectCreationExpression
                    | SyntaxKind::InitializerExpression
                    | SyntaxKind::InvocationExpression
                    | SyntaxKind::MemberAccessExpression
                    | SyntaxKind::ConditionalAccessExpression
                    | SyntaxKind::ElementAccessExpression
                    | SyntaxKind::PrefixUnaryExpression
                    | SyntaxKind::PostfixUnaryExpression
                    | SyntaxKind::AwaitExpression
                    | SyntaxKind::CastExpression
                    | SyntaxKind::BinaryExpression
                    | SyntaxKind::AssignmentExpression
                    | SyntaxKind::ConditionalExpression
                    | SyntaxKind::IsPatternExpression
                    | SyntaxKind::SimpleLambdaExpression
                    | SyntaxKind::ParenthesizedLambdaExpression
                    | SyntaxKind::AnonymousMethodExpression
                    | SyntaxKind::TypeOfExpression
                    | SyntaxKind::DefaultExpression
                    | SyntaxKind::ThrowExpression
                    | SyntaxKind::DeclarationExpression
            )
    }

    pub fn is_lambda(self) -> bool {
        matches!(
            self,
            SyntaxKind::SimpleLambdaExpression
                | SyntaxKind::ParenthesizedLambdaExpression
                | SyntaxKind::AnonymousMethodExpression
        )
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "as" => SyntaxKind::AsKw,
            "base" => SyntaxKind::BaseKw,
            "bool" => SyntaxKind::BoolKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "checked" => SyntaxKind::CheckedKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "decimal" => SyntaxKind::DecimalKw,
            "default" => SyntaxKind::DefaultKw,
            "delegate" => SyntaxKind::DelegateKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "event" => SyntaxKind::EventKw,
            "explicit" => SyntaxKind::ExplicitKw,
            "extern" => SyntaxKind::ExternKw,
            "false" => SyntaxKind::FalseKw,
            "finally" => SyntaxKind::FinallyKw,
            "fixed" => SyntaxKind::FixedKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "foreach" => SyntaxKind::ForeachKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "implicit" => SyntaxKind::ImplicitKw,
            "in" => SyntaxKind::InKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "internal" => SyntaxKind::InternalKw,
            "is" => SyntaxKind::IsKw,
            "lock" => SyntaxKind::LockKw,
            "long" => SyntaxKind::LongKw,
            "namespace" => SyntaxKind::NamespaceKw,
            "new" => SyntaxKind::NewKw,
            "null" => SyntaxKind::NullKw,
            "object" => SyntaxKind::ObjectKw,
            "operator" => SyntaxKind::OperatorKw,
            "out" => SyntaxKind::OutKw,
            "override" => SyntaxKind::OverrideKw,
            "params" => SyntaxKind::ParamsKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "readonly" => SyntaxKind::ReadonlyKw,
            "ref" => SyntaxKind::RefKw,
            "return" => SyntaxKind::ReturnKw,
            "sbyte" => SyntaxKind::SbyteKw,
            "sealed" => SyntaxKind::SealedKw,
            "short" => SyntaxKind::ShortKw,
            "sizeof" => SyntaxKind::SizeofKw,
            "stackalloc" => SyntaxKind::StackallocKw,
            "static" => SyntaxKind::StaticKw,
            "string" => SyntaxKind::StringKw,
            "struct" => SyntaxKind::StructKw,
            "switch" => SyntaxKind::SwitchKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "true" => SyntaxKind::TrueKw,
            "try" => SyntaxKind::TryKw,
            "typeof" => SyntaxKind::TypeofKw,
            "uint" => SyntaxKind::UintKw,
            "ulong" => SyntaxKind::UlongKw,
            "unchecked" => SyntaxKind::UncheckedKw,
            "unsafe" => SyntaxKind::UnsafeKw,
            "ushort" => SyntaxKind::UshortKw,
            "using" => SyntaxKind::UsingKw,
            "virtual" => SyntaxKind::VirtualKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,
            _ => return None,
        })
    }

    /// Contextual keyword kind for `text`, used by the parser when it consumes an
    /// identifier in a keyword position.
    pub fn from_contextual_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "async" => SyntaxKind::AsyncKw,
            "await" => SyntaxKind::AwaitKw,
            "partial" => SyntaxKind::PartialKw,
            "get" => SyntaxKind::GetKw,
            "set" => SyntaxKind::SetKw,
            "init" => SyntaxKind::InitKw,
            "add" => SyntaxKind::AddKw,
            "remove" => SyntaxKind::RemoveKw,
            "where" => SyntaxKind::WhereKw,
            "yield" => SyntaxKind::YieldKw,
            "when" => SyntaxKind::WhenKw,
            "not" => SyntaxKind::NotKw,
            _ => return None,
        })
    }

    /// Source text of fixed-text tokens (keywords and punctuation).
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::PublicKw => "public",
            SyntaxKind::PrivateKw => "private",
            SyntaxKind::ProtectedKw => "protected",
            SyntaxKind::InternalKw => "internal",
            SyntaxKind::NewKw => "new",
            SyntaxKind::ConstKw => "const",
            SyntaxKind::StaticKw => "static",
            SyntaxKind::VirtualKw => "virtual",
            SyntaxKind::SealedKw => "sealed",
            SyntaxKind::OverrideKw => "override",
            SyntaxKind::AbstractKw => "abstract",
            SyntaxKind::ExternKw => "extern",
            SyntaxKind::UnsafeKw => "unsafe",
            SyntaxKind::ReadonlyKw => "readonly",
            SyntaxKind::VolatileKw => "volatile",
            SyntaxKind::AsyncKw => "async",
            SyntaxKind::PartialKw => "partial",
            SyntaxKind::TrueKw => "true",
            SyntaxKind::FalseKw => "false",
            SyntaxKind::NullKw => "null",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::Amp => "&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::Bang => "!",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Eq => "=",
            SyntaxKind::EqEq => "==",
            SyntaxKind::BangEq => "!=",
            SyntaxKind::Less => "<",
            SyntaxKind::LessEq => "<=",
            SyntaxKind::Greater => ">",
            SyntaxKind::GreaterEq => ">=",
            SyntaxKind::AmpAmp => "&&",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::LeftShift => "<<",
            SyntaxKind::RightShift => ">>",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::CloseBracket => "]",
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for C#.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: We've verified the numeric value is within the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_ranges_cover_contextual_keywords() {
        assert!(SyntaxKind::AbstractKw.is_keyword());
        assert!(SyntaxKind::WhileKw.is_keyword());
        assert!(SyntaxKind::WhereKw.is_keyword());
        assert!(SyntaxKind::WhereKw.is_contextual_keyword());
        assert!(!SyntaxKind::WhileKw.is_contextual_keyword());
        assert!(!SyntaxKind::Identifier.is_keyword());
    }

    #[test]
    fn raw_round_trip() {
        for kind in [
            SyntaxKind::Whitespace,
            SyntaxKind::IfStatement,
            SyntaxKind::DeclarationExpression,
        ] {
            let raw = CSharpLanguage::kind_to_raw(kind);
            assert_eq!(CSharpLanguage::kind_from_raw(raw), kind);
        }
        assert_eq!(
            CSharpLanguage::kind_from_raw(rowan::SyntaxKind(u16::MAX)),
            SyntaxKind::Error
        );
    }

    #[test]
    fn directives_are_trivia() {
        assert!(SyntaxKind::RegionDirective.is_trivia());
        assert!(SyntaxKind::Newline.is_trivia());
        assert!(!SyntaxKind::Semicolon.is_trivia());
    }
}
