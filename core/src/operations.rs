//! Instruction semantics.
//!
//! Every operation runs after the fetch has already moved `pc` past the instruction, so
//! "skip" means one more `pc += 2` and the address of the instruction itself is `pc - 2`.

use rand::RngCore;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START};
use crate::error::StepError;
use crate::state::State;

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(0x2);
    }
}

/// clear
pub fn clr(state: &mut State) {
    state.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<(), StepError> {
    match state.pop() {
        Some(addr) => {
            state.pc = addr;
            Ok(())
        }
        None => Err(StepError::StackUnderflow {
            pc: state.pc.wrapping_sub(0x2),
        }),
    }
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) {
    state.pc = addr;
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<(), StepError> {
    if !state.push(state.pc) {
        return Err(StepError::StackOverflow {
            pc: state.pc.wrapping_sub(0x2),
        });
    }
    state.pc = addr;
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] == kk;
    skip_if(state, condition);
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] != kk;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] == state.v[y];
    skip_if(state, condition);
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] != state.v[y];
    skip_if(state, condition);
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) {
    state.v[x] = kk;
}

/// Vx += kk
/// Overflow is dropped and VF is left alone
pub fn add(state: &mut State, x: usize, kk: u8) {
    state.v[x] = state.v[x].wrapping_add(kk);
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) {
    state.v[x] = state.v[y];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) {
    state.v[x] |= state.v[y];
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) {
    state.v[x] &= state.v[y];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) {
    state.v[x] ^= state.v[y];
}

/// Vx += Vy; VF = carry
pub fn addc(state: &mut State, x: usize, y: usize) {
    let (res, carry) = state.v[x].overflowing_add(state.v[y]);
    state.v[x] = res;
    state.set_vf(carry);
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(state: &mut State, x: usize, y: usize) {
    let not_borrow = state.v[x] > state.v[y];
    state.v[x] = state.v[x].wrapping_sub(state.v[y]);
    state.set_vf(not_borrow);
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(state: &mut State, x: usize, y: usize) {
    let not_borrow = state.v[y] > state.v[x];
    state.v[x] = state.v[y].wrapping_sub(state.v[x]);
    state.set_vf(not_borrow);
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: usize) {
    let lsb = state.v[x] & 0x1;
    state.v[x] >>= 1;
    state.set_vf(lsb == 0x1);
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: usize) {
    let msb = state.v[x] >> 7;
    state.v[x] <<= 1;
    state.set_vf(msb == 0x1);
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) {
    state.i = addr;
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) {
    state.pc = u16::from(state.v[0x0]) + addr;
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, rng: &mut dyn RngCore, x: usize, kk: u8) {
    let rand_byte = rng.next_u32() as u8;
    state.v[x] = rand_byte & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any lit pixel is erased
pub fn draw(state: &mut State, x: usize, y: usize, n: u8) {
    let origin_x = state.v[x] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y] as usize % DISPLAY_HEIGHT;

    state.set_vf(false);
    let mut collision = false;

    for row in 0..u16::from(n) {
        let sprite_byte = state.read(state.i.wrapping_add(row));
        let py = (origin_y + row as usize) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite_byte & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel;
            *pixel ^= true;
        }
    }

    state.set_vf(collision);
    state.draw_flag = true;
}

/// if key == Vx then pc += 2
pub fn skpr(state: &mut State, x: usize) {
    let condition = state.pressed_key == Some(state.v[x]);
    skip_if(state, condition);
}

/// if key != Vx then pc += 2
pub fn skup(state: &mut State, x: usize) {
    let condition = state.pressed_key != Some(state.v[x]);
    skip_if(state, condition);
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) {
    state.v[x] = state.delay_timer;
}

/// await keypress for Vx
/// Rewinds onto itself until a key is held, so the same instruction is fetched next step
pub fn keyd(state: &mut State, x: usize) {
    match state.pressed_key {
        Some(key) => {
            state.v[x] = key;
            state.awaiting_key = None;
        }
        None => {
            state.pc = state.pc.wrapping_sub(0x2);
            state.awaiting_key = Some(x as u8);
        }
    }
}

/// DT = Vx
pub fn loadd(state: &mut State, x: usize) {
    state.delay_timer = state.v[x];
}

/// ST = Vx
pub fn loadst(state: &mut State, x: usize) {
    state.sound_timer = state.v[x];
}

/// I += Vx
pub fn addi(state: &mut State, x: usize) {
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) {
    state.i = FONT_START + u16::from(state.v[x]) * FONT_GLYPH_SIZE;
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(state: &mut State, x: usize) {
    let value = state.v[x];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in (0..).zip(digits) {
        state.write(state.i.wrapping_add(offset), digit);
    }
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: usize) {
    for r in 0..=x {
        state.write(state.i.wrapping_add(r as u16), state.v[r]);
    }
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: usize) {
    for r in 0..=x {
        state.v[r] = state.read(state.i.wrapping_add(r as u16));
    }
}
