//! Recursive descent stylesheet parser.
//!
//! Parses source text into a [`ParsedSheet`] using the logos tokenizer from
//! [`crate::style::tokenizer`]. Every error names the 1-based line and column
//! of the offending token; parsing is all-or-nothing.

use logos::Logos;

use crate::style::declaration::PropertyError;
use crate::style::model::*;
use crate::style::tokenizer::Token;

/// Errors from stylesheet parsing and compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}, column {column}: unexpected '{token}': {message}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        token: String,
        message: String,
    },
    #[error("unexpected end of input: {message}")]
    UnexpectedEof { message: String },
    #[error("line {line}, column {column}: invalid declaration '{property}': {source}")]
    InvalidDeclaration {
        line: usize,
        column: usize,
        property: String,
        #[source]
        source: PropertyError,
    },
}

impl ParseError {
    /// The 1-based line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::InvalidDeclaration { line, .. } => Some(*line),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    byte_start: usize,
    byte_end: usize,
}

/// Blank out `/* ... */` comments, keeping byte offsets and newlines intact so
/// that error locations still point into the original source.
fn strip_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out = Vec::with_capacity(len);
    let mut i = 0;

    while i < len {
        if i + 1 < len && bytes[i] == b'/' && bytes[i + 1] == b'*' {
            out.extend_from_slice(b"  ");
            i += 2;
            while i < len {
                if i + 1 < len && bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    out.extend_from_slice(b"  ");
                    i += 2;
                    break;
                }
                out.push(if bytes[i] == b'\n' { b'\n' } else { b' ' });
                i += 1;
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Maps byte offsets to 1-based (line, column) pairs.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, line_starts }
    }

    fn locate(&self, byte: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&byte) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.source.get(start..byte).map_or(1, |s| s.chars().count() + 1);
        (line + 1, column)
    }
}

/// Parse stylesheet source into a [`ParsedSheet`].
pub fn parse_stylesheet(input: &str) -> Result<ParsedSheet, ParseError> {
    let cleaned = strip_comments(input);
    let mut parser = Parser::new(&cleaned)?;

    let mut rules = Vec::new();
    while !parser.is_eof() {
        rules.push(parser.parse_rule()?);
    }

    Ok(ParsedSheet { rules })
}

/// Parse a standalone selector such as `Row > .item:hover`.
pub fn parse_selector(input: &str) -> Result<Selector, ParseError> {
    let mut parser = Parser::new(input)?;
    let selector = parser.parse_selector()?;
    match parser.peek() {
        None => Ok(selector),
        Some(_) => Err(parser.unexpected("trailing input after selector")),
    }
}

struct Parser<'a> {
    tokens: Vec<PToken>,
    cursor: usize,
    lines: LineIndex<'a>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, ParseError> {
        let lines = LineIndex::new(source);
        let mut tokens = Vec::new();

        for (result, span) in Token::lexer(source).spanned() {
            let text = source[span.clone()].to_string();
            match result {
                Ok(token) => tokens.push(PToken {
                    token,
                    text,
                    byte_start: span.start,
                    byte_end: span.end,
                }),
                Err(()) => {
                    let (line, column) = lines.locate(span.start);
                    return Err(ParseError::UnexpectedToken {
                        line,
                        column,
                        token: text,
                        message: "unrecognized character".into(),
                    });
                }
            }
        }

        Ok(Self { tokens, cursor: 0, lines })
    }

    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.peek().is_some_and(|t| &t.token == token)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn error_at(&self, tok: &PToken, message: impl Into<String>) -> ParseError {
        let (line, column) = self.lines.locate(tok.byte_start);
        ParseError::UnexpectedToken {
            line,
            column,
            token: tok.text.clone(),
            message: message.into(),
        }
    }

    /// Error at the current token, or end-of-input if there is none.
    fn unexpected(&self, message: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => self.error_at(tok, message),
            None => ParseError::UnexpectedEof { message: message.into() },
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<PToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok),
            Some(tok) => Err(self.error_at(&tok, format!("expected {what}"))),
            None => Err(ParseError::UnexpectedEof { message: format!("expected {what}") }),
        }
    }

    /// Whether the current token touches the previous one (no whitespace).
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        self.peek().is_some_and(|curr| curr.byte_start == prev.byte_end)
    }

    fn parse_rule(&mut self) -> Result<RuleSet, ParseError> {
        let selectors = self.parse_selector_list()?;
        self.expect(&Token::BraceOpen, "'{'")?;
        let declarations = self.parse_declarations()?;
        self.expect(&Token::BraceClose, "'}'")?;
        Ok(RuleSet { selectors, declarations })
    }

    fn parse_selector_list(&mut self) -> Result<Vec<Selector>, ParseError> {
        let mut selectors = vec![self.parse_selector()?];
        while self.peek_is(&Token::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        Ok(selectors)
    }

    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound_selector()?)];

        loop {
            match self.peek().map(|t| &t.token) {
                Some(Token::GreaterThan) => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                // A selector-starting token after whitespace opens a descendant step;
                // adjacent ones were already consumed by the compound.
                Some(
                    Token::Ident
                    | Token::Hash
                    | Token::HashIdent
                    | Token::HexColor
                    | Token::Dot
                    | Token::Star
                    | Token::PseudoClass,
                ) => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();

        match self.peek().map(|t| t.token.clone()) {
            Some(Token::Ident) => {
                let tok = self.advance().ok_or_else(|| self.unexpected("type name"))?;
                compound.push(SelectorComponent::Type(tok.text));
            }
            Some(Token::Star) => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(Token::Dot | Token::Hash | Token::HashIdent | Token::HexColor | Token::PseudoClass) => {
                compound.push(self.parse_qualifier()?);
            }
            _ => return Err(self.unexpected("expected selector")),
        }

        while self.is_adjacent()
            && matches!(
                self.peek().map(|t| &t.token),
                Some(Token::Dot | Token::Hash | Token::HashIdent | Token::HexColor | Token::PseudoClass)
            )
        {
            compound.push(self.parse_qualifier()?);
        }

        Ok(compound)
    }

    /// `.class`, `#id` or `:pseudo`.
    fn parse_qualifier(&mut self) -> Result<SelectorComponent, ParseError> {
        let tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof { message: "expected selector".into() })?;

        match tok.token {
            Token::Dot => {
                let name = self.expect(&Token::Ident, "class name after '.'")?;
                Ok(SelectorComponent::Class(name.text))
            }
            Token::Hash => {
                let name = self.expect(&Token::Ident, "id after '#'")?;
                Ok(SelectorComponent::Id(name.text))
            }
            Token::HashIdent | Token::HexColor => Ok(SelectorComponent::Id(tok.text[1..].to_string())),
            Token::PseudoClass => Ok(SelectorComponent::PseudoClass(tok.text[1..].to_string())),
            _ => Err(self.error_at(&tok, "expected '.', '#' or ':'")),
        }
    }

    fn parse_declarations(&mut self) -> Result<Vec<RawDeclaration>, ParseError> {
        let mut declarations = Vec::new();
        while self.peek().is_some_and(|t| t.token != Token::BraceClose) {
            // Stray semicolons are tolerated.
            if self.peek_is(&Token::Semicolon) {
                self.advance();
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }
        Ok(declarations)
    }

    /// `property: value1 value2 [!important];`
    fn parse_declaration(&mut self) -> Result<RawDeclaration, ParseError> {
        let prop_tok = self.expect(&Token::Ident, "property name")?;
        let (line, column) = self.lines.locate(prop_tok.byte_start);

        let mut values = Vec::new();

        // `color:red` lexes the value as a pseudo-class token.
        match self.peek().map(|t| t.token.clone()) {
            Some(Token::PseudoClass) => {
                let tok = self.advance().ok_or_else(|| self.unexpected("value"))?;
                values.push(DeclarationValue::Ident(tok.text[1..].to_string()));
            }
            _ => {
                self.expect(&Token::Colon, "':' after property name")?;
            }
        }

        let mut important = false;
        loop {
            match self.peek().map(|t| &t.token) {
                None | Some(Token::Semicolon | Token::BraceClose) => break,
                Some(Token::Important) => {
                    self.advance();
                    important = true;
                    break;
                }
                Some(_) => values.push(self.parse_declaration_value()?),
            }
        }

        if values.is_empty() {
            return Err(self.unexpected(format!("expected a value for '{}'", prop_tok.text)));
        }

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Ok(RawDeclaration {
            property: prop_tok.text,
            values,
            important,
            line,
            column,
        })
    }

    fn parse_declaration_value(&mut self) -> Result<DeclarationValue, ParseError> {
        let tok = self.advance().ok_or_else(|| ParseError::UnexpectedEof {
            message: "expected declaration value".into(),
        })?;

        match tok.token {
            Token::Number => tok
                .text
                .parse()
                .map(DeclarationValue::Number)
                .map_err(|_| self.error_at(&tok, "invalid number")),
            Token::Dimension => {
                let (num, unit) =
                    split_dimension(&tok.text).ok_or_else(|| self.error_at(&tok, "invalid dimension"))?;
                let n: f32 = num.parse().map_err(|_| self.error_at(&tok, "invalid number in dimension"))?;
                Ok(DeclarationValue::Dimension(n, unit.to_string()))
            }
            Token::Ident => Ok(DeclarationValue::Ident(tok.text)),
            Token::HexColor => Ok(DeclarationValue::Color(tok.text[1..].to_string())),
            Token::HashIdent => Err(self.error_at(&tok, "invalid hex color")),
            Token::StringLiteral | Token::StringLiteralSingle => {
                Ok(DeclarationValue::String(tok.text[1..tok.text.len() - 1].to_string()))
            }
            _ => Err(self.error_at(&tok, "unexpected token in declaration value")),
        }
    }
}

/// Split `"50%"` or `"4dp"` into `("50", "%")` / `("4", "dp")`.
fn split_dimension(s: &str) -> Option<(&str, &str)> {
    let unit_start = s
        .char_indices()
        .find(|(i, c)| !c.is_ascii_digit() && *c != '.' && !(*c == '-' && *i == 0))
        .map(|(i, _)| i)?;

    if unit_start == 0 || unit_start >= s.len() {
        return None;
    }

    Some((&s[..unit_start], &s[unit_start..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> ParsedSheet {
        parse_stylesheet(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn first_rule(input: &str) -> RuleSet {
        parse(input).rules.into_iter().next().expect("at least one rule")
    }

    fn first_compound(sel: &Selector) -> &[SelectorComponent] {
        match &sel.parts[0] {
            SelectorPart::Compound(c) => &c.components,
            _ => panic!("expected compound selector at index 0"),
        }
    }

    #[test]
    fn simple_rule() {
        let rule = first_rule(".selected { color: red; }");
        assert_eq!(first_compound(&rule.selectors[0]), &[SelectorComponent::Class("selected".into())]);
        let decl = &rule.declarations[0];
        assert_eq!(decl.property, "color");
        assert_eq!(decl.values, vec![DeclarationValue::Ident("red".into())]);
        assert!(!decl.important);
        assert_eq!((decl.line, decl.column), (1, 13));
    }

    #[test]
    fn compound_selector() {
        let rule = first_rule("Button.primary:hover { color: blue }");
        assert_eq!(
            first_compound(&rule.selectors[0]),
            &[
                SelectorComponent::Type("Button".into()),
                SelectorComponent::Class("primary".into()),
                SelectorComponent::PseudoClass("hover".into()),
            ]
        );
    }

    #[test]
    fn descendant_and_child_combinators() {
        let rule = first_rule("Window .list > Item { color: red }");
        let parts = &rule.selectors[0].parts;
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[1], SelectorPart::Combinator(Combinator::Descendant));
        assert_eq!(parts[3], SelectorPart::Combinator(Combinator::Child));
    }

    #[test]
    fn space_before_class_is_descendant() {
        let rule = first_rule("Row .cell { color: red }");
        assert_eq!(rule.selectors[0].parts.len(), 3);
    }

    #[test]
    fn selector_list() {
        let rule = first_rule("#ok, .a, * { color: red }");
        assert_eq!(rule.selectors.len(), 3);
        assert_eq!(first_compound(&rule.selectors[0]), &[SelectorComponent::Id("ok".into())]);
        assert_eq!(first_compound(&rule.selectors[2]), &[SelectorComponent::Universal]);
    }

    #[test]
    fn hex_looking_id() {
        let rule = first_rule("#add { color: red }");
        assert_eq!(first_compound(&rule.selectors[0]), &[SelectorComponent::Id("add".into())]);
    }

    #[test]
    fn id_starting_with_hex_letters() {
        let rule = first_rule("#add-button, #deadbeefc, Row > #fade-in.big { color: red }");
        assert_eq!(first_compound(&rule.selectors[0]), &[SelectorComponent::Id("add-button".into())]);
        assert_eq!(first_compound(&rule.selectors[1]), &[SelectorComponent::Id("deadbeefc".into())]);
        assert_eq!(
            rule.selectors[2].parts[2],
            SelectorPart::Compound(CompoundSelector {
                components: vec![SelectorComponent::Id("fade-in".into()), SelectorComponent::Class("big".into())]
            })
        );
    }

    #[test]
    fn non_hex_color_value_is_rejected() {
        let err = parse_stylesheet("X { background: #ff00zz; }").expect_err("not a color");
        assert!(matches!(err, ParseError::UnexpectedToken { ref token, .. } if token == "#ff00zz"), "{err}");
    }

    #[test]
    fn values_of_every_kind() {
        let rule = first_rule(r#"X { a: 4dp 50% 0 #ff0000 "icon.svg" auto !important; }"#);
        let decl = &rule.declarations[0];
        assert!(decl.important);
        assert_eq!(
            decl.values,
            vec![
                DeclarationValue::Dimension(4.0, "dp".into()),
                DeclarationValue::Dimension(50.0, "%".into()),
                DeclarationValue::Number(0.0),
                DeclarationValue::Color("ff0000".into()),
                DeclarationValue::String("icon.svg".into()),
                DeclarationValue::Ident("auto".into()),
            ]
        );
    }

    #[test]
    fn colon_without_space() {
        let rule = first_rule("X { color:red; margin:4dp }");
        assert_eq!(rule.declarations[0].values, vec![DeclarationValue::Ident("red".into())]);
        assert_eq!(rule.declarations[1].values, vec![DeclarationValue::Dimension(4.0, "dp".into())]);
    }

    #[test]
    fn comments_keep_line_numbers() {
        let sheet = parse("/* header\n comment */\n.a {\n  color: red;\n}");
        assert_eq!(sheet.rules[0].declarations[0].line, 4);
    }

    #[test]
    fn multiple_rules_in_order() {
        let sheet = parse(".selected { color: red }\n.selected { color: blue }");
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[1].declarations[0].values[0], DeclarationValue::Ident("blue".into()));
    }

    #[test]
    fn empty_input_is_empty_sheet() {
        assert!(parse("").rules.is_empty());
        assert!(parse("/* only a comment */").rules.is_empty());
    }

    #[test]
    fn missing_brace_reports_location() {
        let err = parse_stylesheet(".a { color: red }\n.b color: blue }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, ":");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unterminated_rule_is_eof() {
        let err = parse_stylesheet(".a { color: red;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn unrecognized_character_is_an_error() {
        let err = parse_stylesheet("\n\n  @media { }").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("'@'"), "{err}");
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(parse_stylesheet(".a { color: ; }").is_err());
    }

    #[test]
    fn standalone_selector() {
        let sel = parse_selector("Row > .item:hover").expect("valid selector");
        assert_eq!(sel.parts.len(), 3);
        assert!(parse_selector("Row {").is_err());
    }

    #[test]
    fn split_dimension_cases() {
        assert_eq!(split_dimension("50%"), Some(("50", "%")));
        assert_eq!(split_dimension("-4.5dp"), Some(("-4.5", "dp")));
        assert_eq!(split_dimension("42"), None);
    }
}
