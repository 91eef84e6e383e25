//! Recursive-descent parser producing the [`crate::ast`] tree from a token
//! stream. Treated as an external collaborator by the specification; full
//! concrete surface syntax (array-size brackets, match-arm punctuation,
//! etc.) is this parser's own invention where the spec leaves it
//! unspecified, since the spec's core concentration is the analyzer, not
//! textual grammar.
//!
//! Per spec §7, the parser cannot recover from a hard desync: unexpected
//! tokens or EOF mid-construct are reported via
//! [`DiagnosticSink::fatal`], which prints and terminates the process.

use std::rc::Rc;

use lync_common::{DiagnosticSink, LineMap, Ownership, Span, Stage, TypeTag};
use lync_lexer::{Token, TokenKind};

use crate::ast::*;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    diags: &'a mut DiagnosticSink,
    line_map: &'a LineMap,
    next_id: u32,
    file: Rc<str>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: Vec<Token>, diags: &'a mut DiagnosticSink, line_map: &'a LineMap, file: Rc<str>) -> Self {
        Parser { tokens, pos: 0, diags, line_map, next_id: 0, file }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn fatal(&mut self, msg: impl Into<String>) -> ! {
        let loc = self.line_map.span_location(self.peek_span());
        self.diags.fatal(Stage::Parser, loc, msg.into())
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.at(&kind) {
            self.bump()
        } else {
            self.fatal(format!("expected {what}, found {:?}", self.peek()))
        }
    }

    fn expect_ident(&mut self) -> String {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.bump();
                name
            }
            other => self.fatal(format!("expected identifier, found {other:?}")),
        }
    }

    /// Parses a full program: every `using` import, then every `def`.
    pub fn parse_program(&mut self) -> Program {
        let mut imports = Vec::new();
        while matches!(self.peek(), TokenKind::Using) {
            imports.push(self.parse_import());
        }
        let mut funcs = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            funcs.push(self.parse_func());
        }
        Program { imports, funcs }
    }

    fn parse_import(&mut self) -> Import {
        let start = self.peek_span();
        self.expect(TokenKind::Using, "'using'");
        let mut path = vec![self.expect_ident()];
        while matches!(self.peek(), TokenKind::Dot) {
            self.bump();
            if matches!(self.peek(), TokenKind::LParen) {
                break;
            }
            path.push(self.expect_ident());
        }
        self.expect(TokenKind::LParen, "'('");
        let item = if matches!(self.peek(), TokenKind::Star) {
            self.bump();
            ImportItem::All
        } else {
            ImportItem::Named(self.expect_ident())
        };
        self.expect(TokenKind::RParen, "')'");
        self.expect(TokenKind::Semicolon, "';'");
        Import { path, item, span: start.to(self.peek_span()) }
    }

    fn parse_type_tag(&mut self) -> TypeTag {
        match self.bump().kind {
            TokenKind::KwInt => TypeTag::Int,
            TokenKind::KwBool => TypeTag::Bool,
            TokenKind::KwStr => TypeTag::Str,
            TokenKind::KwChar => TypeTag::Char,
            TokenKind::KwVoid => TypeTag::Void,
            other => self.fatal(format!("expected type name, found {other:?}")),
        }
    }

    fn parse_ownership(&mut self) -> Ownership {
        match self.peek() {
            TokenKind::Own => {
                self.bump();
                Ownership::Own
            }
            TokenKind::Ref => {
                self.bump();
                Ownership::Ref
            }
            _ => Ownership::None,
        }
    }

    /// Parses `[":" ownership? type "?"? ("[" size? "]")?]`, returning
    /// `(type, ownership, nullable, is_array, array_size)`.
    fn parse_type_annotation(&mut self) -> (TypeTag, Ownership, bool, bool, Option<i64>) {
        self.expect(TokenKind::Colon, "':'");
        let ownership = self.parse_ownership();
        let type_tag = self.parse_type_tag();
        let nullable = if matches!(self.peek(), TokenKind::Question) {
            self.bump();
            true
        } else {
            false
        };
        let (is_array, array_size) = if matches!(self.peek(), TokenKind::LBracket) {
            self.bump();
            let size = if let TokenKind::IntLiteral(n) = self.peek() {
                let n = *n;
                self.bump();
                Some(n)
            } else {
                None
            };
            self.expect(TokenKind::RBracket, "']'");
            (true, size)
        } else {
            (false, None)
        };
        (type_tag, ownership, nullable, is_array, array_size)
    }

    fn parse_param(&mut self) -> Param {
        let start = self.peek_span();
        let is_const = if matches!(self.peek(), TokenKind::Const) {
            self.bump();
            true
        } else {
            false
        };
        let name = self.expect_ident();
        let (type_tag, ownership, nullable, is_array, _size) = self.parse_type_annotation();
        Param {
            name,
            type_tag,
            ownership,
            nullable,
            is_const,
            is_array,
            span: start.to(self.peek_span()),
        }
    }

    fn parse_func(&mut self) -> Func {
        let start = self.peek_span();
        self.expect(TokenKind::Def, "'def'");
        let name = self.expect_ident();
        self.expect(TokenKind::LParen, "'('");
        let mut params = Vec::new();
        if !matches!(self.peek(), TokenKind::RParen) {
            params.push(self.parse_param());
            while matches!(self.peek(), TokenKind::Comma) {
                self.bump();
                params.push(self.parse_param());
            }
        }
        self.expect(TokenKind::RParen, "')'");
        let (ret_type, ret_ownership, ret_nullable, _is_array, _size) = self.parse_type_annotation();
        let sign = FuncSign {
            name,
            params,
            ret_type,
            ret_ownership,
            ret_nullable,
            span: start.to(self.peek_span()),
        };
        let body = self.parse_block_stmt();
        Func { sign, body }
    }

    fn parse_block_stmt(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.peek_span();
        self.expect(TokenKind::LBrace, "'{'");
        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace) {
            stmts.push(self.parse_stmt());
        }
        self.expect(TokenKind::RBrace, "'}'");
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::Block(stmts) }
    }

    fn parse_stmt(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.peek_span();
        match self.peek().clone() {
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::Const | TokenKind::Ident(_) if self.looks_like_decl() => self.parse_var_decl(id, start),
            TokenKind::If => self.parse_if(id, start),
            TokenKind::While => self.parse_while(id, start),
            TokenKind::Do => self.parse_do_while(id, start),
            TokenKind::For => self.parse_for(id, start),
            TokenKind::Match => self.parse_match_stmt(id, start),
            TokenKind::Free => self.parse_free(id, start),
            TokenKind::Return => self.parse_return(id, start),
            TokenKind::Ident(name) if self.is_assignment_ahead() => self.parse_assignment(id, start, name),
            _ => {
                let expr = self.parse_expr();
                self.expect(TokenKind::Semicolon, "';'");
                Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::ExprStmt(expr) }
            }
        }
    }

    /// Disambiguates `name: type = init;` declarations from other
    /// statements starting with an identifier (assignment, call
    /// expression-statement) by looking for a `:` after an optional
    /// `const` and the name.
    fn looks_like_decl(&self) -> bool {
        let mut i = self.pos;
        if matches!(self.tokens[i].kind, TokenKind::Const) {
            i += 1;
        }
        if !matches!(self.tokens.get(i).map(|t| &t.kind), Some(TokenKind::Ident(_))) {
            return false;
        }
        matches!(self.tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Colon))
    }

    fn is_assignment_ahead(&self) -> bool {
        matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Eq))
            || matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::LBracket))
    }

    fn parse_var_decl(&mut self, id: NodeId, start: Span) -> Stmt {
        let is_const = if matches!(self.peek(), TokenKind::Const) {
            self.bump();
            true
        } else {
            false
        };
        let name = self.expect_ident();
        let (type_tag, ownership, nullable, is_array, array_size) = self.parse_type_annotation();
        self.expect(TokenKind::Eq, "'='");
        let init = self.parse_expr();
        self.expect(TokenKind::Semicolon, "';'");
        Stmt {
            id,
            span: start.to(self.peek_span()),
            kind: StmtKind::VarDecl {
                name,
                type_tag,
                ownership,
                nullable,
                is_const,
                is_array,
                array_size,
                init,
            },
        }
    }

    fn parse_assignment(&mut self, id: NodeId, start: Span, name: String) -> Stmt {
        self.bump(); // identifier
        if matches!(self.peek(), TokenKind::LBracket) {
            self.bump();
            let index = self.parse_expr();
            self.expect(TokenKind::RBracket, "']'");
            self.expect(TokenKind::Eq, "'='");
            let value = self.parse_expr();
            self.expect(TokenKind::Semicolon, "';'");
            Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::IndexAssign { name, index, value } }
        } else {
            self.expect(TokenKind::Eq, "'='");
            let value = self.parse_expr();
            self.expect(TokenKind::Semicolon, "';'");
            Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::Assign { name, value } }
        }
    }

    fn parse_if(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // if
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        let then_branch = Box::new(self.parse_stmt());
        let else_branch = if matches!(self.peek(), TokenKind::Else) {
            self.bump();
            Some(Box::new(self.parse_stmt()))
        } else {
            None
        };
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::If { cond, then_branch, else_branch } }
    }

    fn parse_while(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // while
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        let body = Box::new(self.parse_stmt());
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::While { cond, body } }
    }

    fn parse_do_while(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // do
        let body = Box::new(self.parse_stmt());
        self.expect(TokenKind::While, "'while'");
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        self.expect(TokenKind::Semicolon, "';'");
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::DoWhile { body, cond } }
    }

    fn parse_for(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // for
        self.expect(TokenKind::LParen, "'('");
        let var = self.expect_ident();
        self.expect(TokenKind::Colon, "':'");
        let min = self.parse_expr();
        self.expect(TokenKind::DotDotEq, "'..='");
        let max = self.parse_expr();
        self.expect(TokenKind::RParen, "')'");
        let body = Box::new(self.parse_stmt());
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::For { var, min, max, body } }
    }

    fn parse_free(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // free
        let name = self.expect_ident();
        self.expect(TokenKind::Semicolon, "';'");
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::Free { name } }
    }

    fn parse_return(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // return
        let value = if matches!(self.peek(), TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::Semicolon, "';'");
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::Return(value) }
    }

    fn parse_match_stmt(&mut self, id: NodeId, start: Span) -> Stmt {
        self.bump(); // match
        let subject = self.parse_expr();
        let arms = self.parse_match_arms(/* statement_form */ true);
        Stmt { id, span: start.to(self.peek_span()), kind: StmtKind::Match { subject, arms } }
    }

    fn parse_match_arms(&mut self, statement_form: bool) -> Vec<MatchArm> {
        self.expect(TokenKind::LBrace, "'{'");
        let mut arms = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace) {
            let arm_id = self.fresh_id();
            let arm_start = self.peek_span();
            let pattern = self.parse_pattern();
            self.expect(TokenKind::Colon, "':'");
            let body = if matches!(self.peek(), TokenKind::LBrace) || statement_form {
                MatchBody::Stmts(self.parse_arm_stmts())
            } else {
                let e = self.parse_expr();
                if matches!(self.peek(), TokenKind::Comma) {
                    self.bump();
                }
                MatchBody::Expr(e)
            };
            arms.push(MatchArm { id: arm_id, pattern, body, span: arm_start.to(self.peek_span()) });
        }
        self.expect(TokenKind::RBrace, "'}'");
        arms
    }

    fn parse_arm_stmts(&mut self) -> Vec<Stmt> {
        if matches!(self.peek(), TokenKind::LBrace) {
            self.bump();
            let mut stmts = Vec::new();
            while !matches!(self.peek(), TokenKind::RBrace) {
                stmts.push(self.parse_stmt());
            }
            self.expect(TokenKind::RBrace, "'}'");
            if matches!(self.peek(), TokenKind::Comma) {
                self.bump();
            }
            stmts
        } else {
            vec![self.parse_stmt()]
        }
    }

    fn parse_pattern(&mut self) -> Pattern {
        match self.peek().clone() {
            TokenKind::Null => {
                self.bump();
                Pattern::Null
            }
            TokenKind::Underscore => {
                self.bump();
                Pattern::Wildcard
            }
            TokenKind::Some => {
                self.bump();
                self.expect(TokenKind::LParen, "'('");
                let binder = self.expect_ident();
                self.expect(TokenKind::RParen, "')'");
                Pattern::Some(binder)
            }
            _ => Pattern::Value(self.parse_expr()),
        }
    }

    // ---- Expressions (precedence climbing) ----

    fn parse_expr(&mut self) -> Expr {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Expr {
        let mut lhs = self.parse_and();
        while matches!(self.peek(), TokenKind::PipePipe) {
            self.bump();
            let rhs = self.parse_and();
            lhs = self.binary(BinaryOp::Or, lhs, rhs);
        }
        lhs
    }

    fn parse_and(&mut self) -> Expr {
        let mut lhs = self.parse_equality();
        while matches!(self.peek(), TokenKind::AmpAmp) {
            self.bump();
            let rhs = self.parse_equality();
            lhs = self.binary(BinaryOp::And, lhs, rhs);
        }
        lhs
    }

    fn parse_equality(&mut self) -> Expr {
        let mut lhs = self.parse_relational();
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_relational();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_relational(&mut self) -> Expr {
        let mut lhs = self.parse_additive();
        loop {
            let op = match self.peek() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_additive();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_additive(&mut self) -> Expr {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_multiplicative();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let id = self.fresh_id();
        let span = lhs.span.to(rhs.span);
        Expr { id, span, kind: ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) } }
    }

    fn parse_unary(&mut self) -> Expr {
        let start = self.peek_span();
        match self.peek() {
            TokenKind::Minus => {
                self.bump();
                let id = self.fresh_id();
                let expr = self.parse_unary();
                Expr { id, span: start.to(expr.span), kind: ExprKind::Unary { op: UnaryOp::Neg, expr: Box::new(expr) } }
            }
            TokenKind::Bang => {
                self.bump();
                let id = self.fresh_id();
                let expr = self.parse_unary();
                Expr { id, span: start.to(expr.span), kind: ExprKind::Unary { op: UnaryOp::Not, expr: Box::new(expr) } }
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            if matches!(self.peek(), TokenKind::LBracket) {
                let id = self.fresh_id();
                self.bump();
                let index = self.parse_expr();
                self.expect(TokenKind::RBracket, "']'");
                let span = expr.span.to(self.peek_span());
                expr = Expr { id, span, kind: ExprKind::Index { array: Box::new(expr), index: Box::new(index) } };
            } else {
                break;
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let id = self.fresh_id();
        let start = self.peek_span();
        match self.peek().clone() {
            TokenKind::IntLiteral(n) => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::IntLit(n) }
            }
            TokenKind::True => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::BoolLit(true) }
            }
            TokenKind::False => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::BoolLit(false) }
            }
            TokenKind::StringLiteral(s) => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::StrLit(s) }
            }
            TokenKind::CharLiteral(c) => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::CharLit(c) }
            }
            TokenKind::Null => {
                self.bump();
                Expr { id, span: start, kind: ExprKind::NullLit }
            }
            TokenKind::Alloc => {
                self.bump();
                self.expect(TokenKind::LParen, "'('");
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                Expr { id, span: start.to(self.peek_span()), kind: ExprKind::Alloc(Box::new(inner)) }
            }
            TokenKind::Some => {
                self.bump();
                self.expect(TokenKind::LParen, "'('");
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                Expr { id, span: start.to(self.peek_span()), kind: ExprKind::Some(Box::new(inner)) }
            }
            TokenKind::Match => {
                self.bump();
                let subject = self.parse_expr();
                let arms = self.parse_match_arms(false);
                Expr { id, span: start.to(self.peek_span()), kind: ExprKind::Match { subject: Box::new(subject), arms } }
            }
            TokenKind::LBracket => {
                self.bump();
                let mut elems = Vec::new();
                if !matches!(self.peek(), TokenKind::RBracket) {
                    elems.push(self.parse_expr());
                    while matches!(self.peek(), TokenKind::Comma) {
                        self.bump();
                        elems.push(self.parse_expr());
                    }
                }
                self.expect(TokenKind::RBracket, "']'");
                Expr { id, span: start.to(self.peek_span()), kind: ExprKind::ArrayLit(elems) }
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                inner
            }
            TokenKind::Ident(name) => {
                self.bump();
                if matches!(self.peek(), TokenKind::LParen) {
                    self.bump();
                    let mut args = Vec::new();
                    if !matches!(self.peek(), TokenKind::RParen) {
                        args.push(self.parse_expr());
                        while matches!(self.peek(), TokenKind::Comma) {
                            self.bump();
                            args.push(self.parse_expr());
                        }
                    }
                    self.expect(TokenKind::RParen, "')'");
                    Expr { id, span: start.to(self.peek_span()), kind: ExprKind::Call { name, args } }
                } else {
                    Expr { id, span: start, kind: ExprKind::Var(name) }
                }
            }
            other => self.fatal(format!("unexpected token in expression: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_lexer::Lexer;

    fn parse(src: &str) -> Program {
        let file: Rc<str> = Rc::from("t.lync");
        let line_map = Lexer::line_map(src, file.clone());
        let mut diags = DiagnosticSink::new(20, false);
        let tokens = Lexer::new(file.clone(), src).tokenize(&mut diags, &line_map);
        assert!(!diags.has_errors(), "lex errors: {:?}", diags.messages());
        let mut parser = Parser::new(tokens, &mut diags, &line_map, file);
        parser.parse_program()
    }

    #[test]
    fn parses_minimal_main() {
        let prog = parse("def main(): int { return 0; }");
        assert_eq!(prog.funcs.len(), 1);
        assert_eq!(prog.funcs[0].sign.name, "main");
    }

    #[test]
    fn parses_own_decl_and_free() {
        let prog = parse(
            "def main(): int { x: own int = alloc(7); print(x); free x; return 0; }",
        );
        let StmtKind::Block(stmts) = &prog.funcs[0].body.kind else { panic!() };
        assert!(matches!(stmts[0].kind, StmtKind::VarDecl { .. }));
        assert!(matches!(stmts[2].kind, StmtKind::Free { .. }));
    }

    #[test]
    fn parses_nullable_match() {
        let prog = parse(
            "def main(): int { p: own? int = null; match p { some(v): { print(v); } null: { print(0); } } return 0; }",
        );
        let StmtKind::Block(stmts) = &prog.funcs[0].body.kind else { panic!() };
        assert!(matches!(stmts[1].kind, StmtKind::Match { .. }));
    }

    #[test]
    fn parses_using_import() {
        let prog = parse("using std.io.(*); def main(): int { return 0; }");
        assert_eq!(prog.imports.len(), 1);
        assert_eq!(prog.imports[0].path, vec!["std".to_string(), "io".to_string()]);
    }

    #[test]
    fn parses_for_loop_range() {
        let prog = parse("def main(): int { for (i: 0..=9) { print(i); } return 0; }");
        let StmtKind::Block(stmts) = &prog.funcs[0].body.kind else { panic!() };
        assert!(matches!(stmts[0].kind, StmtKind::For { .. }));
    }
}
