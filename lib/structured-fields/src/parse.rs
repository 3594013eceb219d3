use crate::{
    error::{ErrorKind, ParseError},
    item::{BareItem, Decimal, Integer, Key, SfString, Token},
    Dictionary, InnerList, Item, List, ListEntry, Parameters,
};
use logos::{Lexer, Logos, Span};

#[derive(Clone, Copy, Debug, Logos, PartialEq)]
enum TokenTy {
    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Decimal,

    #[regex(r#""([ !#-\[\]-~]|\\["\\])*""#)]
    String,

    #[regex(r"[A-Za-z*][!#$%&'*+\-.^_`|~0-9A-Za-z:/]*")]
    Token,

    #[regex(r":[A-Za-z0-9+/=]*:")]
    ByteSequence,

    #[token("?1")]
    True,

    #[token("?0")]
    False,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equals,

    #[token(",")]
    Comma,

    #[regex(r"[ \t]+")]
    Whitespace,
}

#[derive(Clone, Debug)]
struct Lexeme {
    ty: TokenTy,
    span: Span,
}

struct Parser<'a> {
    /// Original input, the lexeme spans index into it
    input: &'a str,

    lexemes: Vec<Lexeme>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let lexemes = Lexer::<'_, TokenTy>::new(input)
            .spanned()
            .map(|(ty, span)| match ty {
                Ok(ty) => Ok(Lexeme { ty, span }),
                Err(()) => Err(ParseError::new(ErrorKind::UnexpectedCharacter, span)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            input,
            lexemes,
            position: 0,
        })
    }

    /// Run a top-level parse: leading and trailing spaces are discarded, anything else left over is an error
    fn run<T>(mut self, parse: fn(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        self.skip_whitespace(true)?;
        let value = parse(&mut self)?;
        self.skip_whitespace(true)?;

        match self.peek() {
            None => Ok(value),
            Some(lexeme) => Err(ParseError::new(
                ErrorKind::TrailingCharacters,
                lexeme.span.start..self.input.len(),
            )),
        }
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.position)
    }

    fn peek_ty(&self) -> Option<TokenTy> {
        self.peek().map(|lexeme| lexeme.ty)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.lexemes.len()
    }

    fn slice(&self, span: &Span) -> &'a str {
        &self.input[span.clone()]
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(lexeme) => ParseError::new(ErrorKind::UnexpectedCharacter, lexeme.span.clone()),
            None => ParseError::new(ErrorKind::UnexpectedEnd, self.input.len()..self.input.len()),
        }
    }

    fn eat(&mut self, ty: TokenTy) -> bool {
        let matches = self.peek_ty() == Some(ty);
        if matches {
            self.position += 1;
        }
        matches
    }

    fn expect(&mut self, ty: TokenTy) -> Result<(), ParseError> {
        if self.eat(ty) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skip over whitespace and report whether there was any
    ///
    /// Some positions only allow SP, tabs are rejected there
    fn skip_whitespace(&mut self, spaces_only: bool) -> Result<bool, ParseError> {
        let Some(lexeme) = self.peek() else {
            return Ok(false);
        };

        if lexeme.ty != TokenTy::Whitespace {
            return Ok(false);
        }

        if spaces_only {
            if let Some(offset) = self.slice(&lexeme.span).find('\t') {
                let position = lexeme.span.start + offset;
                return Err(ParseError::new(
                    ErrorKind::UnexpectedCharacter,
                    position..position + 1,
                ));
            }
        }

        self.position += 1;
        Ok(true)
    }

    /// Members of lists and dictionaries are separated by a comma with optional whitespace around it
    ///
    /// Returns `false` once the input is exhausted
    fn next_member(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace(false)?;
        if self.is_at_end() {
            return Ok(false);
        }

        self.expect(TokenTy::Comma)?;
        self.skip_whitespace(false)?;

        // Trailing comma
        if self.is_at_end() {
            return Err(self.unexpected());
        }

        Ok(true)
    }

    fn parse_list(&mut self) -> Result<List, ParseError> {
        let mut list = List::new();
        if self.is_at_end() {
            return Ok(list);
        }

        loop {
            list.push(self.parse_item_or_inner_list()?);
            if !self.next_member()? {
                break Ok(list);
            }
        }
    }

    fn parse_dictionary(&mut self) -> Result<Dictionary, ParseError> {
        let mut dictionary = Dictionary::new();
        if self.is_at_end() {
            return Ok(dictionary);
        }

        loop {
            let key = self.parse_key()?;
            let member = if self.eat(TokenTy::Equals) {
                self.parse_item_or_inner_list()?
            } else {
                ListEntry::Item(Item {
                    bare_item: BareItem::Boolean(true),
                    params: self.parse_parameters()?,
                })
            };

            // Duplicate keys keep their first position but take the last value
            dictionary.insert(key, member);

            if !self.next_member()? {
                break Ok(dictionary);
            }
        }
    }

    fn parse_item_or_inner_list(&mut self) -> Result<ListEntry, ParseError> {
        if self.peek_ty() == Some(TokenTy::OpenParen) {
            self.parse_inner_list().map(ListEntry::InnerList)
        } else {
            self.parse_item().map(ListEntry::Item)
        }
    }

    fn parse_inner_list(&mut self) -> Result<InnerList, ParseError> {
        self.expect(TokenTy::OpenParen)?;

        let mut items = Vec::new();
        loop {
            self.skip_whitespace(true)?;

            if self.eat(TokenTy::CloseParen) {
                let params = self.parse_parameters()?;
                break Ok(InnerList { items, params });
            }

            items.push(self.parse_item()?);

            if !matches!(
                self.peek_ty(),
                Some(TokenTy::Whitespace | TokenTy::CloseParen)
            ) {
                break Err(self.unexpected());
            }
        }
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        let bare_item = self.parse_bare_item()?;
        let params = self.parse_parameters()?;

        Ok(Item { bare_item, params })
    }

    fn parse_bare_item(&mut self) -> Result<BareItem, ParseError> {
        let Some(Lexeme { ty, span }) = self.peek().cloned() else {
            return Err(self.unexpected());
        };
        let raw = self.slice(&span);

        let bare_item = match ty {
            TokenTy::Integer => BareItem::Integer(
                parse_integer(raw)
                    .ok_or_else(|| ParseError::new(ErrorKind::IntegerOutOfRange, span))?,
            ),
            TokenTy::Decimal => BareItem::Decimal(
                parse_decimal(raw)
                    .ok_or_else(|| ParseError::new(ErrorKind::DecimalOutOfRange, span))?,
            ),
            TokenTy::String => BareItem::String(SfString::new_unchecked(unescape(
                &raw[1..raw.len() - 1],
            ))),
            TokenTy::Token => BareItem::Token(Token::new_unchecked(raw)),
            TokenTy::ByteSequence => BareItem::ByteSequence(
                base64_simd::STANDARD
                    .decode_to_vec(&raw[1..raw.len() - 1])
                    .map_err(|_| ParseError::new(ErrorKind::InvalidByteSequence, span))?,
            ),
            TokenTy::True => BareItem::Boolean(true),
            TokenTy::False => BareItem::Boolean(false),
            _ => return Err(self.unexpected()),
        };

        self.position += 1;
        Ok(bare_item)
    }

    fn parse_parameters(&mut self) -> Result<Parameters, ParseError> {
        let mut params = Parameters::new();
        while self.eat(TokenTy::Semicolon) {
            self.skip_whitespace(true)?;

            let key = self.parse_key()?;
            let value = if self.eat(TokenTy::Equals) {
                self.parse_bare_item()?
            } else {
                BareItem::Boolean(true)
            };

            params.insert(key, value);
        }

        Ok(params)
    }

    fn parse_key(&mut self) -> Result<Key, ParseError> {
        let Some(Lexeme { ty, span }) = self.peek().cloned() else {
            return Err(self.unexpected());
        };

        // Keys are lexed as tokens, their grammar is a strict subset
        if ty != TokenTy::Token {
            return Err(ParseError::new(ErrorKind::InvalidKey, span));
        }

        let key = self
            .slice(&span)
            .parse::<Key>()
            .map_err(|_| ParseError::new(ErrorKind::InvalidKey, span))?;

        self.position += 1;
        Ok(key)
    }
}

fn parse_integer(raw: &str) -> Option<Integer> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.len() > 15 {
        return None;
    }

    raw.parse::<i64>().ok().and_then(|value| Integer::try_from(value).ok())
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let (is_negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw),
    };

    let (integral, fractional) = digits.split_once('.')?;
    if integral.len() > 12 || fractional.len() > 3 {
        return None;
    }

    let integral = integral.parse::<i64>().ok()?;
    let mut fraction = fractional.parse::<i64>().ok()?;
    for _ in fractional.len()..3 {
        fraction *= 10;
    }

    let thousandths = integral * 1000 + fraction;
    Decimal::from_thousandths(if is_negative {
        -thousandths
    } else {
        thousandths
    })
    .ok()
}

/// Resolve `\"` and `\\` escapes. The lexer already guarantees no other escapes exist
fn unescape(raw: &str) -> String {
    let mut unescaped = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                unescaped.push(escaped);
            }
        } else {
            unescaped.push(c);
        }
    }

    unescaped
}

pub(crate) fn item(input: &str) -> Result<Item, ParseError> {
    Parser::new(input)?.run(Parser::parse_item)
}

pub(crate) fn inner_list(input: &str) -> Result<InnerList, ParseError> {
    Parser::new(input)?.run(Parser::parse_inner_list)
}

pub(crate) fn list(input: &str) -> Result<List, ParseError> {
    Parser::new(input)?.run(Parser::parse_list)
}

pub(crate) fn dictionary(input: &str) -> Result<Dictionary, ParseError> {
    Parser::new(input)?.run(Parser::parse_dictionary)
}
