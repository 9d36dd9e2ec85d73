// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::syntax::token::{Terminal, Tokens};
use crate::syntax::{Error, Tree};

type Result<T> = std::result::Result<T, Error>;

// =========================================================================
// Parser
// =========================================================================

/// Builds the syntax tree for one compilation unit using a
/// straightforward recursive descent over the token stream.
pub struct Parser {
    /// Provides access to our token stream.
    tokens: Tokens,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self> {
        Ok(Self {
            tokens: Tokens::new(input)?,
        })
    }

    /// Parse the whole input into a `Tree::Program` holding the
    /// top-level forms in source order.
    pub fn parse(&mut self) -> Result<Tree> {
        let mut forms = Vec::new();
        loop {
            // Skip any leading whitespace
            self.skip_spaces();
            // Dispatch on lookahead
            match self.tokens.peek().kind {
                Terminal::Eof => {
                    return Ok(Tree::Program(forms));
                }
                _ => {
                    forms.push(self.parse_element()?);
                }
            }
        }
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn parse_element(&mut self) -> Result<Tree> {
        let token = self.tokens.peek();
        // Dispatch on lookahead
        match token.kind {
            Terminal::Letter => self.parse_atom(),
            Terminal::Digit => self.parse_literal(),
            Terminal::LeftParen => self.parse_list(),
            Terminal::RightParen => Err(Error::UnexpectedRightParen(token.offset)),
            Terminal::Eof => Err(Error::UnexpectedEof),
            Terminal::Space => unreachable!(),
        }
    }

    fn parse_list(&mut self) -> Result<Tree> {
        // Consume opening parenthesis
        self.tokens.advance();
        let mut children = Vec::new();
        loop {
            self.skip_spaces();
            match self.tokens.peek().kind {
                Terminal::RightParen => {
                    // Consume closing parenthesis
                    self.tokens.advance();
                    return Ok(Tree::List(children));
                }
                Terminal::Eof => {
                    return Err(Error::UnexpectedEof);
                }
                _ => {
                    children.push(self.parse_element()?);
                }
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Tree> {
        let mut name = String::new();
        name.push(self.tokens.advance().value);
        // An atom continues with letters or digits
        while matches!(self.tokens.peek().kind, Terminal::Letter | Terminal::Digit) {
            name.push(self.tokens.advance().value);
        }
        Ok(Tree::Atom(name))
    }

    fn parse_literal(&mut self) -> Result<Tree> {
        let mut digits = String::new();
        digits.push(self.tokens.advance().value);
        while self.tokens.peek().kind == Terminal::Digit {
            digits.push(self.tokens.advance().value);
        }
        Ok(Tree::Literal(digits))
    }

    fn skip_spaces(&mut self) {
        while self.tokens.peek().kind == Terminal::Space {
            self.tokens.advance();
        }
    }
}
