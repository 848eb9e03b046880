//! Build the typed tree from a tree-sitter Java CST

use tree_sitter::Node;

use super::*;

/// Statement node kinds that may appear directly in a block.
const STATEMENT_KINDS: &[&str] = &[
    "expression_statement",
    "local_variable_declaration",
    "return_statement",
    "throw_statement",
    "block",
    "if_statement",
    "for_statement",
    "enhanced_for_statement",
    "while_statement",
    "do_statement",
    "try_statement",
    "try_with_resources_statement",
    "synchronized_statement",
    "labeled_statement",
    "break_statement",
    "continue_statement",
    "yield_statement",
    "assert_statement",
    "explicit_constructor_invocation",
    "local_class_declaration",
    "class_declaration",
    "switch_statement",
];

const EXPRESSION_KINDS: &[&str] = &[
    "method_invocation",
    "binary_expression",
    "unary_expression",
    "update_expression",
    "assignment_expression",
    "lambda_expression",
    "method_reference",
    "null_literal",
    "string_literal",
    "text_block",
    "true",
    "false",
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
    "character_literal",
    "identifier",
    "field_access",
    "parenthesized_expression",
    "this",
    "super",
    "object_creation_expression",
    "array_creation_expression",
    "array_access",
    "array_initializer",
    "cast_expression",
    "instanceof_expression",
    "ternary_expression",
    "class_literal",
    "switch_expression",
];

const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

fn is_statement_kind(kind: &str) -> bool {
    STATEMENT_KINDS.contains(&kind)
}

fn is_expression_kind(kind: &str) -> bool {
    EXPRESSION_KINDS.contains(&kind)
}

fn span_of(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn all_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Builds one [`CompilationUnit`] from a parsed tree.
pub struct UnitBuilder<'s> {
    source: &'s str,
}

impl<'s> UnitBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        UnitBuilder { source }
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source.as_bytes()).unwrap_or("").to_string()
    }

    pub fn build(&self, root: Node, path: &str) -> CompilationUnit {
        let mut unit = CompilationUnit {
            path: path.to_string(),
            source: self.source.to_string(),
            package: None,
            package_span: None,
            imports: Vec::new(),
            types: Vec::new(),
            references: Vec::new(),
        };

        for child in named_children(root) {
            match child.kind() {
                "package_declaration" => {
                    unit.package = named_children(child)
                        .into_iter()
                        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
                        .map(|c| self.text(c));
                    unit.package_span = Some(span_of(child));
                }
                "import_declaration" => unit.imports.push(self.build_import(child)),
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    unit.types.push(self.build_class(child));
                }
                _ => {}
            }
        }

        self.collect_references(root, &mut unit.references);
        unit
    }

    fn build_import(&self, node: Node) -> Import {
        let mut is_static = false;
        let mut wildcard = false;
        let mut path = String::new();
        for child in all_children(node) {
            match child.kind() {
                "static" => is_static = true,
                "asterisk" => wildcard = true,
                "scoped_identifier" | "identifier" => path = self.text(child),
                _ => {}
            }
        }
        Import {
            path,
            is_static,
            wildcard,
            span: span_of(node),
        }
    }

    fn build_class(&self, node: Node) -> ClassDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let mut class = ClassDecl {
            name,
            span: span_of(node),
            methods: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
        };
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(body, &mut class);
        }
        class
    }

    fn collect_members(&self, body: Node, class: &mut ClassDecl) {
        for member in named_children(body) {
            match member.kind() {
                "method_declaration" | "constructor_declaration" => {
                    class.methods.push(self.build_method(member));
                }
                "field_declaration" => class.fields.push(self.build_field(member)),
                // enum constants come first, members follow in this wrapper
                "enum_body_declarations" => self.collect_members(member, class),
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    class.nested.push(self.build_class(member));
                }
                _ => {}
            }
        }
    }

    fn build_field(&self, node: Node) -> FieldDecl {
        let initializers = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .filter_map(|d| d.child_by_field_name("value"))
            .map(|v| self.build_expr(v))
            .collect();
        FieldDecl {
            span: span_of(node),
            initializers,
        }
    }

    fn build_method(&self, node: Node) -> MethodDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();

        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();
        if let Some(mods) = named_children(node).into_iter().find(|c| c.kind() == "modifiers") {
            for child in all_children(mods) {
                match child.kind() {
                    "marker_annotation" | "annotation" => {
                        if let Some(name_node) = child.child_by_field_name("name") {
                            annotations.push(Annotation {
                                name: self.text(name_node),
                                has_arguments: child.kind() == "annotation",
                                span: span_of(child),
                                name_span: span_of(name_node),
                            });
                        }
                    }
                    _ if !child.is_named() => modifiers.push(Modifier {
                        keyword: child.kind().to_string(),
                        span: span_of(child),
                    }),
                    _ => {}
                }
            }
        }

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| {
                named_children(params)
                    .into_iter()
                    .filter_map(|p| match p.kind() {
                        "formal_parameter" => p.child_by_field_name("name").map(|n| self.text(n)),
                        "spread_parameter" => named_children(p)
                            .into_iter()
                            .find(|c| c.kind() == "variable_declarator")
                            .and_then(|d| d.child_by_field_name("name"))
                            .map(|n| self.text(n)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let body = node.child_by_field_name("body").map(|b| self.build_block(b));

        MethodDecl {
            name,
            annotations,
            modifiers,
            parameters,
            body,
            span: span_of(node),
        }
    }

    /// Works for `block` and `constructor_body`.
    pub fn build_block(&self, node: Node) -> Block {
        let statements = named_children(node)
            .into_iter()
            .filter(|c| c.kind() != "line_comment" && c.kind() != "block_comment")
            .map(|c| self.build_stmt(c))
            .collect();
        Block {
            span: span_of(node),
            statements,
        }
    }

    fn build_stmt(&self, node: Node) -> Stmt {
        let span = span_of(node);
        match node.kind() {
            "expression_statement" => match named_children(node).into_iter().next() {
                Some(expr) => Stmt::Expression {
                    expr: self.build_expr(expr),
                    span,
                },
                None => Stmt::Other {
                    kind: "expression_statement".to_string(),
                    span,
                },
            },
            "local_variable_declaration" => {
                let initializers = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|d| d.child_by_field_name("value"))
                    .map(|v| self.build_expr(v))
                    .collect();
                Stmt::LocalVar { initializers, span }
            }
            "return_statement" => Stmt::Return {
                value: named_children(node).into_iter().next().map(|e| self.build_expr(e)),
                span,
            },
            "throw_statement" => match named_children(node).into_iter().next() {
                Some(value) => Stmt::Throw {
                    value: self.build_expr(value),
                    span,
                },
                None => Stmt::Other {
                    kind: "throw_statement".to_string(),
                    span,
                },
            },
            "block" => Stmt::Block(self.build_block(node)),
            "break_statement" | "continue_statement" => Stmt::Other {
                kind: node.kind().to_string(),
                span,
            },
            kind if is_expression_kind(kind) => Stmt::Expression {
                expr: self.build_expr(node),
                span,
            },
            kind => {
                let mut exprs = Vec::new();
                let mut body = Vec::new();
                self.descend(node, &mut exprs, &mut body);
                Stmt::Compound {
                    kind: kind.to_string(),
                    exprs,
                    body,
                    span,
                }
            }
        }
    }

    /// Collect the outermost expressions and statements below `node`.
    fn descend(&self, node: Node, exprs: &mut Vec<Expr>, body: &mut Vec<Stmt>) {
        for child in named_children(node) {
            let kind = child.kind();
            if is_statement_kind(kind) {
                body.push(self.build_stmt(child));
            } else if is_expression_kind(kind) {
                exprs.push(self.build_expr(child));
            } else if kind != "line_comment" && kind != "block_comment" {
                self.descend(child, exprs, body);
            }
        }
    }

    pub fn build_expr(&self, node: Node) -> Expr {
        let span = span_of(node);
        match node.kind() {
            "method_invocation" => self.build_invocation(node),
            "binary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| o.kind().to_string())
                    .unwrap_or_default();
                match (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                    (Some(left), Some(right)) => Expr::Binary {
                        op,
                        left: Box::new(self.build_expr(left)),
                        right: Box::new(self.build_expr(right)),
                        span,
                    },
                    _ => self.build_other(node),
                }
            }
            "unary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| o.kind().to_string())
                    .unwrap_or_default();
                match node.child_by_field_name("operand") {
                    Some(operand) => Expr::Unary {
                        op,
                        operand: Box::new(self.build_expr(operand)),
                        span,
                    },
                    None => self.build_other(node),
                }
            }
            "update_expression" => match named_children(node).into_iter().next() {
                Some(operand) => Expr::Update {
                    operand: Box::new(self.build_expr(operand)),
                    span,
                },
                None => self.build_other(node),
            },
            "assignment_expression" => {
                match (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                    (Some(left), Some(right)) => Expr::Assignment {
                        target: Box::new(self.build_expr(left)),
                        value: Box::new(self.build_expr(right)),
                        span,
                    },
                    _ => self.build_other(node),
                }
            }
            "lambda_expression" => self.build_lambda(node),
            "method_reference" => Expr::MethodReference { span },
            "null_literal" => Expr::Literal {
                kind: LiteralKind::Null,
                span,
            },
            "string_literal" | "text_block" => Expr::Literal {
                kind: LiteralKind::String,
                span,
            },
            "true" | "false" => Expr::Literal {
                kind: LiteralKind::Boolean,
                span,
            },
            "character_literal" => Expr::Literal {
                kind: LiteralKind::Char,
                span,
            },
            kind if kind.ends_with("_literal") && kind != "class_literal" => Expr::Literal {
                kind: LiteralKind::Number,
                span,
            },
            "identifier" => Expr::Name {
                name: self.text(node),
                span,
            },
            "field_access" => {
                match (node.child_by_field_name("object"), node.child_by_field_name("field")) {
                    (Some(object), Some(field)) => Expr::FieldAccess {
                        object: Box::new(self.build_expr(object)),
                        field: self.text(field),
                        span,
                    },
                    _ => self.build_other(node),
                }
            }
            "parenthesized_expression" => match named_children(node).into_iter().next() {
                Some(inner) => Expr::Parenthesized {
                    inner: Box::new(self.build_expr(inner)),
                    span,
                },
                None => self.build_other(node),
            },
            _ => self.build_other(node),
        }
    }

    fn build_other(&self, node: Node) -> Expr {
        let mut children = Vec::new();
        let mut statements = Vec::new();
        self.descend(node, &mut children, &mut statements);
        // Statements inside anonymous classes or switch bodies: keep their
        // expressions reachable.
        for stmt in statements {
            flatten_stmt_exprs(stmt, &mut children);
        }
        Expr::Other {
            kind: node.kind().to_string(),
            children,
            span: span_of(node),
        }
    }

    fn build_invocation(&self, node: Node) -> Expr {
        let span = span_of(node);
        let name_node = match node.child_by_field_name("name") {
            Some(n) => n,
            None => return self.build_other(node),
        };
        let select = node
            .child_by_field_name("object")
            .map(|o| Box::new(self.build_expr(o)));
        let (args, args_span) = match node.child_by_field_name("arguments") {
            Some(list) => (
                named_children(list)
                    .into_iter()
                    .filter(|c| c.kind() != "line_comment" && c.kind() != "block_comment")
                    .map(|a| self.build_expr(a))
                    .collect(),
                span_of(list),
            ),
            None => (Vec::new(), Span::new(span.end, span.end)),
        };
        Expr::Invocation(MethodInvocation {
            name: self.text(name_node),
            name_span: span_of(name_node),
            select,
            args,
            args_span,
            span,
        })
    }

    fn build_lambda(&self, node: Node) -> Expr {
        let span = span_of(node);
        let param_count = match node.child_by_field_name("parameters") {
            Some(params) if params.kind() == "identifier" => 1,
            Some(params) => named_children(params)
                .into_iter()
                .filter(|c| c.kind() != "line_comment" && c.kind() != "block_comment")
                .count(),
            None => 0,
        };
        let body = match node.child_by_field_name("body") {
            Some(b) if b.kind() == "block" => LambdaBody::Block(self.build_block(b)),
            Some(b) => LambdaBody::Expr(Box::new(self.build_expr(b))),
            None => return self.build_other(node),
        };
        Expr::Lambda(Lambda {
            param_count,
            body,
            span,
        })
    }

    fn collect_references(&self, node: Node, out: &mut Vec<Reference>) {
        for child in named_children(node) {
            match child.kind() {
                "import_declaration" | "package_declaration" => continue,
                "identifier" | "type_identifier" => {
                    if is_free_reference(node, child) {
                        out.push(Reference {
                            name: self.text(child),
                            span: span_of(child),
                        });
                    }
                }
                _ => self.collect_references(child, out),
            }
        }
    }
}

/// An identifier is free unless it names a member behind a qualifier.
fn is_free_reference(parent: Node, ident: Node) -> bool {
    match parent.kind() {
        "field_access" => parent.child_by_field_name("field") != Some(ident),
        "method_invocation" => {
            parent.child_by_field_name("object").is_none()
                || parent.child_by_field_name("name") != Some(ident)
        }
        "scoped_identifier" => parent.child_by_field_name("name") != Some(ident),
        "scoped_type_identifier" | "method_reference" => {
            named_children(parent).first() == Some(&ident)
        }
        _ => true,
    }
}

fn flatten_stmt_exprs(stmt: Stmt, out: &mut Vec<Expr>) {
    match stmt {
        Stmt::Expression { expr, .. } => out.push(expr),
        Stmt::LocalVar { initializers, .. } => out.extend(initializers),
        Stmt::Return { value, .. } => out.extend(value),
        Stmt::Throw { value, .. } => out.push(value),
        Stmt::Block(block) => {
            for s in block.statements {
                flatten_stmt_exprs(s, out);
            }
        }
        Stmt::Compound { exprs, body, .. } => {
            out.extend(exprs);
            for s in body {
                flatten_stmt_exprs(s, out);
            }
        }
        Stmt::Other { .. } => {}
    }
}
