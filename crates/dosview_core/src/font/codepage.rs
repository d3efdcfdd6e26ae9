use std::collections::HashMap;
use std::sync::OnceLock;

/// Byte substituted for characters the code page cannot represent.
pub const FALLBACK_BYTE: u8 = b'?';

/// CP866 code page, indexed by byte value.
pub static CP866: [char; 256] = build_table();

const UPPER_HALF: [char; 128] = [
    // 0x80
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П',
    // 0x90
    'Р', 'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я',
    // 0xA0
    'а', 'б', 'в', 'г', 'д', 'е', 'ж', 'з', 'и', 'й', 'к', 'л', 'м', 'н', 'о', 'п',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'р', 'с', 'т', 'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я',
    // 0xF0
    'Ё', 'ё', 'Є', 'є', 'Ї', 'ї', 'Ў', 'ў', '°', '∙', '·', '√', '№', '¤', '■', '\u{00A0}',
];

const fn build_table() -> [char; 256] {
    let mut table = ['\0'; 256];
    let mut index = 0;
    while index < 128 {
        table[index] = index as u8 as char;
        index += 1;
    }
    while index < 256 {
        table[index] = UPPER_HALF[index - 128];
        index += 1;
    }
    table
}

fn reverse_table() -> &'static HashMap<char, u8> {
    static REVERSE: OnceLock<HashMap<char, u8>> = OnceLock::new();
    REVERSE.get_or_init(|| {
        CP866.iter().enumerate().skip(128).map(|(byte, &ch)| (ch, byte as u8)).collect()
    })
}

/// Maps a character to its CP866 byte, falling back to `?`.
pub fn resolve_byte(ch: char) -> u8 {
    let scalar = u32::from(ch);
    if scalar <= 0x7F {
        return scalar as u8;
    }

    reverse_table().get(&ch).copied().unwrap_or(FALLBACK_BYTE)
}

/// Maps the first scalar of `text`, or a space when `text` is empty.
pub fn resolve_text(text: &str) -> u8 {
    text.chars().next().map_or(b' ', resolve_byte)
}

pub fn decode_byte(byte: u8) -> char {
    CP866[usize::from(byte)]
}

pub fn decode_cp866(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| decode_byte(byte)).collect()
}
