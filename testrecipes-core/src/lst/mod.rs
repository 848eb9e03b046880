//! Typed tree for Java compilation units
//!
//! A tagged-variant model over the tree-sitter CST. Every node keeps the byte
//! [`Span`] it was parsed from and the unit owns the original source, so the
//! tree can always be "reprinted" by splicing edits into that source: any
//! region no edit touches stays byte-identical.
//!
//! ```text
//! source → tree-sitter CST → UnitBuilder::build() → CompilationUnit
//! ```

pub mod build;
pub mod walk;

pub use walk::{walk, NodeRef};

/// Half-open byte range `[start, end)` into the unit's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One parsed Java source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// File path or "<string>"
    pub path: String,
    /// Original source text; all spans index into it
    pub source: String,
    pub package: Option<String>,
    pub package_span: Option<Span>,
    pub imports: Vec<Import>,
    pub types: Vec<ClassDecl>,
    /// Free identifier references outside import/package declarations.
    /// Member names behind a qualifier (`a.b`, `x.call()`) are not included.
    pub references: Vec<Reference>,
}

impl CompilationUnit {
    /// Original text covered by a span.
    pub fn text(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    /// Every class declared in this unit, nested ones included.
    pub fn all_classes(&self) -> Vec<&ClassDecl> {
        fn collect<'a>(class: &'a ClassDecl, out: &mut Vec<&'a ClassDecl>) {
            out.push(class);
            for nested in &class.nested {
                collect(nested, out);
            }
        }
        let mut out = Vec::new();
        for class in &self.types {
            collect(class, &mut out);
        }
        out
    }

    /// True if any class in the unit declares a method with this name.
    pub fn declares_method(&self, name: &str) -> bool {
        self.all_classes()
            .iter()
            .any(|c| c.methods.iter().any(|m| m.name == name))
    }

    /// True if a free reference with this name remains anywhere in the unit.
    pub fn references_name(&self, name: &str) -> bool {
        self.references.iter().any(|r| r.name == name)
    }

    /// Fully-qualified name for a class declared at top level of this unit.
    pub fn qualify(&self, simple: &str) -> String {
        match &self.package {
            Some(pkg) => format!("{}.{}", pkg, simple),
            None => simple.to_string(),
        }
    }
}

/// An import declaration.
///
/// `path` is the dotted name as written, without a trailing `.*`:
/// `import static org.junit.jupiter.api.Assertions.*;` has path
/// `org.junit.jupiter.api.Assertions` and `wildcard = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub wildcard: bool,
    pub span: Span,
}

impl Import {
    /// The type this import is about. Package wildcards return the package.
    pub fn type_name(&self) -> &str {
        if self.is_static && !self.wildcard {
            split_last(&self.path).0
        } else {
            &self.path
        }
    }

    /// Imported member for single static imports.
    pub fn member(&self) -> Option<&str> {
        if self.is_static && !self.wildcard {
            Some(split_last(&self.path).1)
        } else {
            None
        }
    }

    /// Simple name brought into scope by a single-type import.
    pub fn simple_name(&self) -> Option<&str> {
        if !self.is_static && !self.wildcard {
            Some(split_last(&self.path).1)
        } else {
            None
        }
    }

    /// True if this import makes `type_name.member` callable unqualified.
    pub fn covers_member(&self, type_name: &str, member: &str) -> bool {
        self.is_static
            && self.type_name() == type_name
            && (self.wildcard || self.member() == Some(member))
    }

    /// True if this import makes the simple name of `fqn` resolve to it.
    pub fn covers_type(&self, fqn: &str) -> bool {
        if self.is_static {
            return false;
        }
        if self.wildcard {
            split_last(fqn).0 == self.path
        } else {
            self.path == fqn
        }
    }

    /// Source form, used for sorting and for printing new imports.
    pub fn render(&self) -> String {
        let mut out = String::from("import ");
        if self.is_static {
            out.push_str("static ");
        }
        out.push_str(&self.path);
        if self.wildcard {
            out.push_str(".*");
        }
        out.push(';');
        out
    }
}

/// Split `a.b.c` into (`a.b`, `c`). A name without dots yields ("", name).
pub fn split_last(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub span: Span,
    pub methods: Vec<MethodDecl>,
    pub fields: Vec<FieldDecl>,
    pub nested: Vec<ClassDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub span: Span,
    pub initializers: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub parameters: Vec<String>,
    pub body: Option<Block>,
    pub span: Span,
}

impl MethodDecl {
    pub fn has_modifier(&self, keyword: &str) -> bool {
        self.modifiers.iter().any(|m| m.keyword == keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Name as written: `Test` or `org.junit.Test`
    pub name: String,
    pub has_arguments: bool,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub keyword: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    /// Includes the braces
    pub span: Span,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression { expr: Expr, span: Span },
    LocalVar { initializers: Vec<Expr>, span: Span },
    Return { value: Option<Expr>, span: Span },
    Throw { value: Expr, span: Span },
    Block(Block),
    /// if / for / while / do / try / switch / synchronized
    Compound {
        kind: String,
        exprs: Vec<Expr>,
        body: Vec<Stmt>,
        span: Span,
    },
    Other { kind: String, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression { span, .. }
            | Stmt::LocalVar { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Compound { span, .. }
            | Stmt::Other { span, .. } => *span,
            Stmt::Block(block) => block.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Null,
    String,
    Boolean,
    Number,
    Char,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub param_count: usize,
    pub body: LambdaBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodInvocation {
    pub name: String,
    pub name_span: Span,
    /// Receiver or qualifier: `Assertions` in `Assertions.assertTrue(x)`
    pub select: Option<Box<Expr>>,
    pub args: Vec<Expr>,
    /// The argument list including its parentheses
    pub args_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Invocation(MethodInvocation),
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
        span: Span,
    },
    /// `x++`, `--x`
    Update { operand: Box<Expr>, span: Span },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Lambda(Lambda),
    MethodReference { span: Span },
    Literal { kind: LiteralKind, span: Span },
    Name { name: String, span: Span },
    FieldAccess {
        object: Box<Expr>,
        field: String,
        span: Span,
    },
    Parenthesized { inner: Box<Expr>, span: Span },
    /// Anything else; keeps nested expressions reachable for scans
    Other {
        kind: String,
        children: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Invocation(inv) => inv.span,
            Expr::Lambda(lambda) => lambda.span,
            Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Assignment { span, .. }
            | Expr::MethodReference { span }
            | Expr::Literal { span, .. }
            | Expr::Name { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::Parenthesized { span, .. }
            | Expr::Other { span, .. } => *span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        match self {
            Expr::Parenthesized { inner, .. } => inner.unparenthesized(),
            other => other,
        }
    }

    /// Dotted name for `a`, `a.b.c` chains; `None` for anything else.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            Expr::Name { name, .. } => Some(name.clone()),
            Expr::FieldAccess { object, field, .. } => {
                let base = object.qualified_name()?;
                Some(format!("{}.{}", base, field))
            }
            _ => None,
        }
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self.unparenthesized(), Expr::Literal { kind: LiteralKind::Null, .. })
    }

    /// Lambdas and method references: values of a functional interface.
    pub fn is_functional(&self) -> bool {
        matches!(self.unparenthesized(), Expr::Lambda(_) | Expr::MethodReference { .. })
    }

    /// Direct sub-expressions.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Invocation(inv) => {
                let mut out: Vec<&Expr> = Vec::new();
                if let Some(select) = &inv.select {
                    out.push(select);
                }
                out.extend(inv.args.iter());
                out
            }
            Expr::Binary { left, right, .. } => vec![left, right],
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => vec![operand],
            Expr::Assignment { target, value, .. } => vec![target, value],
            Expr::Lambda(lambda) => match &lambda.body {
                LambdaBody::Expr(e) => vec![e],
                LambdaBody::Block(_) => Vec::new(),
            },
            Expr::FieldAccess { object, .. } => vec![object],
            Expr::Parenthesized { inner, .. } => vec![inner],
            Expr::Other { children, .. } => children.iter().collect(),
            Expr::MethodReference { .. } | Expr::Literal { .. } | Expr::Name { .. } => Vec::new(),
        }
    }
}
