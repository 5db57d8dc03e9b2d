/*!
Number scanning.

A number accumulates its digits into a signed 64-bit magnitude; overflow, a
fraction, or an exponent promotes it to a double. Fraction digits keep
feeding the same accumulator while bumping a decimal scale, and the net
exponent is applied in one multiply or divide at the end so the common
decimal literals round once.

Emission picks the cheapest representation: an integer that fits the word
payload is packed straight into the value word, an i32 that doesn't fit the
payload spills to one tape word, and everything else lays down a two-word
double.
*/

use super::{
    error::{ErrorCode, RawError},
    tape::{self, Tag},
    Parser,
};

impl<'input> Parser<'input> {
    /**
    Scan the number starting at the cursor and emit its AST word.

    The driver only dispatches here on a digit or `-`.
    */
    pub(super) fn scan_number(&mut self) -> Result<usize, RawError> {
        let negative = *get_unchecked!(self.input, self.p) == b'-';

        if negative {
            self.p += 1;

            match self.peek() {
                None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p)),
                Some(b'0'..=b'9') => (),
                Some(_) => return Err(RawError::new(ErrorCode::ExpectedValue, self.p)),
            }
        }

        let mut int_acc: i64 = 0;
        let mut double_acc = 0.0;
        let mut promoted = false;

        // the integer part is a lone `0` or a run starting 1-9; a digit
        // right after a leading zero ends the number here and the driver
        // reports the stray digit as a missing comma
        if *get_unchecked!(self.input, self.p) == b'0' {
            self.p += 1;
        } else {
            while let Some(digit @ b'0'..=b'9') = self.peek() {
                push_digit(&mut int_acc, &mut double_acc, &mut promoted, digit);
                self.p += 1;
            }
        }

        let mut scale: i64 = 0;
        let mut has_frac = false;

        if self.peek() == Some(b'.') {
            has_frac = true;
            self.p += 1;

            match self.peek() {
                None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p)),
                Some(b'0'..=b'9') => (),
                Some(_) => return Err(RawError::new(ErrorCode::ExpectedValue, self.p)),
            }

            while let Some(digit @ b'0'..=b'9') = self.peek() {
                push_digit(&mut int_acc, &mut double_acc, &mut promoted, digit);
                scale += 1;
                self.p += 1;
            }
        }

        let mut exponent: i64 = 0;
        let mut has_exp = false;

        if let Some(b'e' | b'E') = self.peek() {
            has_exp = true;
            self.p += 1;

            let exp_negative = match self.peek() {
                Some(b'-') => {
                    self.p += 1;
                    true
                }
                Some(b'+') => {
                    self.p += 1;
                    false
                }
                _ => false,
            };

            match self.peek() {
                None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p)),
                Some(b'0'..=b'9') => (),
                Some(_) => return Err(RawError::new(ErrorCode::MssingExponent, self.p)),
            }

            while let Some(digit @ b'0'..=b'9') = self.peek() {
                exponent = exponent
                    .saturating_mul(10)
                    .saturating_add((digit - b'0') as i64);
                self.p += 1;
            }

            if exp_negative {
                exponent = -exponent;
            }
        }

        if !has_frac && !has_exp && !promoted {
            let value = if negative { -int_acc } else { int_acc };

            if let Ok(small) = i32::try_from(value) {
                if tape::fits_payload(small) {
                    return Ok(tape::pack_signed(Tag::Integer, small as isize));
                }

                // only reachable when the payload is narrower than 32 bits
                let index = match self.tape.push_ast(small as isize as usize) {
                    Some(index) => index,
                    None => return Err(RawError::new(ErrorCode::OutOfMemory, self.p)),
                };

                return Ok(tape::pack(Tag::IntTape, index));
            }
        }

        let mut value = if promoted { double_acc } else { int_acc as f64 };
        value = apply_exponent(value, exponent - scale);

        if negative {
            value = -value;
        }

        self.emit_double(value)
    }

    fn emit_double(&mut self, value: f64) -> Result<usize, RawError> {
        let bits = value.to_bits();

        let index = match self.tape.push_ast(bits as u32 as usize) {
            Some(index) => index,
            None => return Err(RawError::new(ErrorCode::OutOfMemory, self.p)),
        };

        if self.tape.push_ast((bits >> 32) as u32 as usize).is_none() {
            return Err(RawError::new(ErrorCode::OutOfMemory, self.p));
        }

        Ok(tape::pack(Tag::Double, index))
    }
}

#[inline]
fn push_digit(int_acc: &mut i64, double_acc: &mut f64, promoted: &mut bool, digit: u8) {
    let digit = (digit - b'0') as i64;

    if !*promoted {
        if let Some(value) = int_acc.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            *int_acc = value;
            return;
        }

        *promoted = true;
        *double_acc = *int_acc as f64;
    }

    *double_acc = *double_acc * 10.0 + digit as f64;
}

/**
Apply a net decimal exponent.

Dividing for negative exponents keeps a single rounding step for the common
cases, so `0.005e3` comes out as exactly `5.0`.
*/
#[inline]
fn apply_exponent(value: f64, exponent: i64) -> f64 {
    // past +-400 the value has saturated to infinity or zero anyway
    let exponent = exponent.clamp(-400, 400) as i32;

    if exponent < 0 {
        value / 10f64.powi(-exponent)
    } else if exponent > 0 {
        value * 10f64.powi(exponent)
    } else {
        value
    }
}
