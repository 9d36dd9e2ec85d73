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
use crate::syntax::Error;

// =================================================================
// Token
// =================================================================

/// The terminal classes of the source alphabet.  Every token covers
/// exactly one character of the (whitespace-collapsed) input; the
/// tree builder assembles identifiers and integers out of `Letter`
/// and `Digit` runs itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Terminal {
    LeftParen,
    RightParen,
    Space,
    Digit,
    Letter,
    Eof,
}

/// A single-character token.  Letters are normalized to lower case,
/// since identifiers are case-insensitive.
#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub kind: Terminal,
    pub value: char,
    /// Byte offset of this character in the original input.
    pub offset: usize,
}

// =================================================================
// Token stream
// =================================================================

/// The tokenized form of one source file, along with a cursor for the
/// tree builder.  Newlines and tabs count as spaces, and runs of
/// whitespace collapse into a single `Space` token.  The stream is
/// always terminated by exactly one `Eof` token.
pub struct Tokens {
    tokens: Vec<Token>,
    index: usize,
}

impl Tokens {
    pub fn new(input: &str) -> Result<Self, Error> {
        let mut tokens: Vec<Token> = Vec::new();
        //
        for (offset, c) in input.char_indices() {
            let kind = match c {
                '(' => Terminal::LeftParen,
                ')' => Terminal::RightParen,
                ' ' | '\t' | '\n' | '\r' => Terminal::Space,
                '0'..='9' => Terminal::Digit,
                'a'..='z' | 'A'..='Z' => Terminal::Letter,
                _ => {
                    return Err(Error::UnexpectedCharacter(offset));
                }
            };
            // Collapse whitespace runs
            if kind == Terminal::Space && matches!(tokens.last(), Some(t) if t.kind == Terminal::Space) {
                continue;
            }
            let value = if kind == Terminal::Space {
                ' '
            } else {
                c.to_ascii_lowercase()
            };
            tokens.push(Token { kind, value, offset });
        }
        //
        tokens.push(Token {
            kind: Terminal::Eof,
            value: '\0',
            offset: input.len(),
        });
        //
        Ok(Self { tokens, index: 0 })
    }

    /// Look at the current token without consuming it.
    pub fn peek(&self) -> Token {
        self.tokens[self.index]
    }

    /// Consume the current token.  The trailing `Eof` is never
    /// consumed, so `peek` remains valid at all times.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens[self.index];
        if token.kind != Terminal::Eof {
            self.index += 1;
        }
        token
    }
}
