use proptest::prelude::*;
use rand::rngs::mock::StepRng;

use chip8_core::Chip8;

fn run(rom: &[u8], steps: usize) -> Chip8 {
    let mut chip8 = Chip8::with_rng(Box::new(StepRng::new(0, 0)));
    chip8.load_rom(rom).unwrap();
    for _ in 0..steps {
        chip8.step().unwrap();
    }
    chip8
}

proptest! {
    #[test]
    fn load_then_add_wraps(x in 0u8..0xF, kk in any::<u8>(), kk2 in any::<u8>()) {
        let chip8 = run(&[0x60 | x, kk, 0x70 | x, kk2], 2);
        prop_assert_eq!(chip8.state().v[x as usize], kk.wrapping_add(kk2));
    }

    #[test]
    fn add_with_carry(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V1, vx; LD V2, vy; ADD V1, V2
        let chip8 = run(&[0x61, vx, 0x62, vy, 0x81, 0x24], 3);
        let sum = u16::from(vx) + u16::from(vy);
        prop_assert_eq!(chip8.state().v[0x1], (sum % 256) as u8);
        prop_assert_eq!(chip8.state().vf(), u8::from(sum >= 256));
    }

    #[test]
    fn sub_with_not_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V1, vx; LD V2, vy; SUB V1, V2
        let chip8 = run(&[0x61, vx, 0x62, vy, 0x81, 0x25], 3);
        prop_assert_eq!(chip8.state().v[0x1], vx.wrapping_sub(vy));
        prop_assert_eq!(chip8.state().vf(), u8::from(vx > vy));
    }

    #[test]
    fn subn_with_not_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V1, vx; LD V2, vy; SUBN V1, V2
        let chip8 = run(&[0x61, vx, 0x62, vy, 0x81, 0x27], 3);
        prop_assert_eq!(chip8.state().v[0x1], vy.wrapping_sub(vx));
        prop_assert_eq!(chip8.state().vf(), u8::from(vy > vx));
    }

    #[test]
    fn shifts_ignore_vy(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V1, vx; LD V2, vy; SHR V1 {, V2}
        let shr = run(&[0x61, vx, 0x62, vy, 0x81, 0x26], 3);
        prop_assert_eq!(shr.state().v[0x1], vx >> 1);
        prop_assert_eq!(shr.state().vf(), vx & 0x1);

        // LD V1, vx; LD V2, vy; SHL V1 {, V2}
        let shl = run(&[0x61, vx, 0x62, vy, 0x81, 0x2E], 3);
        prop_assert_eq!(shl.state().v[0x1], vx << 1);
        prop_assert_eq!(shl.state().vf(), vx >> 7);
    }

    #[test]
    fn bcd_digits(value in any::<u8>()) {
        // LD V0, value; LD I, 0x300; LD B, V0
        let chip8 = run(&[0x60, value, 0xA3, 0x00, 0xF0, 0x33], 3);
        let digits = &chip8.state().memory[0x300..0x303];
        let decoded = u16::from(digits[0]) * 100 + u16::from(digits[1]) * 10 + u16::from(digits[2]);
        prop_assert_eq!(decoded, u16::from(value));
        prop_assert!(digits.iter().all(|&d| d < 10));
    }

    #[test]
    fn drawing_twice_restores_the_frame(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let n = sprite.len() as u8;
        let mut rom = vec![
            0x60, x,          // 0x200: LD V0, x
            0x61, y,          // 0x202: LD V1, y
            0xA2, 0x0C,       // 0x204: LD I, 0x20C
            0xD0, 0x10 | n,   // 0x206: DRW V0, V1, n
            0xD0, 0x10 | n,   // 0x208: DRW V0, V1, n
            0x12, 0x0A,       // 0x20A: JP 0x20A
        ];
        rom.extend_from_slice(&sprite);

        let mut chip8 = run(&rom, 4);
        prop_assert_eq!(chip8.state().vf(), 0);
        let lit = chip8.frame_buffer().iter().flatten().filter(|&&p| p).count();
        let bits: u32 = sprite.iter().map(|b| b.count_ones()).sum();
        prop_assert_eq!(lit as u32, bits);

        chip8.step().unwrap();
        prop_assert!(chip8.frame_buffer().iter().flatten().all(|&p| !p));
        prop_assert_eq!(chip8.state().vf(), u8::from(bits > 0));
    }
}

#[test]
fn sprites_wrap_around_both_edges() {
    let rom = [
        0x60, 60,   // 0x200: LD V0, 60
        0x61, 30,   // 0x202: LD V1, 30
        0xA2, 0x0A, // 0x204: LD I, 0x20A
        0xD0, 0x12, // 0x206: DRW V0, V1, 2
        0x12, 0x08, // 0x208: JP 0x208
        0xFF, 0xFF, // 0x20A: sprite
    ];
    let chip8 = run(&rom, 4);
    let frame = chip8.frame_buffer();
    for row in [30, 31] {
        assert!(frame[row][60..64].iter().all(|&p| p));
        assert!(frame[row][0..4].iter().all(|&p| p));
        assert!(frame[row][4..60].iter().all(|&p| !p));
    }
    assert!(frame[0].iter().all(|&p| !p));
    assert_eq!(chip8.state().vf(), 0);
}
