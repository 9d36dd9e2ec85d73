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
use std::fmt::Write;

use ruint::aliases::U256;

/// A simple trait allowing something to be rendered as a fixed-width
/// hex word, as used for `PUSH` immediates.  The result is upper-case
/// and zero-padded to exactly `2 * width` characters; `width` is the
/// word width in bytes.
pub trait ToHexWord {
    fn to_hex_word(&self, width: usize) -> String;
}

impl ToHexWord for U256 {
    fn to_hex_word(&self, width: usize) -> String {
        assert!((1..=32).contains(&width));
        let bytes = self.to_be_bytes_vec();
        let mut hexstr = String::with_capacity(2 * width);
        // Write each byte, most significant first
        for b in &bytes[bytes.len() - width..] {
            write!(hexstr, "{:02X}", b).unwrap();
        }
        // Done
        hexstr
    }
}

/// A default implementation for byte offsets within the emitted
/// stream.
impl ToHexWord for usize {
    fn to_hex_word(&self, width: usize) -> String {
        U256::from(*self).to_hex_word(width)
    }
}
