use std::time::Duration;

use tileterm_core::{Key, KeyboardPort, Lifecycle, NoEcho, RecordingSurface, Session};
use tileterm_demos::{CURSOR, GuessGame, HEIGHT, PROMPT, WIDTH};

type Game = Session<GuessGame, RecordingSurface, NoEcho>;

fn started(secret: u32) -> Game {
    let mut s = Session::new(GuessGame::with_secret(secret), RecordingSurface::new(), NoEcho).unwrap();
    s.start().unwrap();
    s.click().unwrap();
    finish(&mut s);
    s
}

fn finish(s: &mut Game) {
    s.finish_blocking(&mut |_: Duration| {}).unwrap();
}

fn type_line(s: &mut Game, line: &str) {
    for c in line.chars() {
        s.key_down(&Key::Char(c)).unwrap();
    }
    s.key_down(&Key::Enter).unwrap();
    finish(s);
}

fn shown(s: &Game) -> String {
    let tiles: Vec<u8> = s
        .surface()
        .final_tiles(WIDTH, HEIGHT)
        .into_iter()
        .map(|t| t.unwrap_or(0))
        .collect();
    String::from_utf8_lossy(&tiles).into_owned()
}

#[test]
fn title_screen_waits_for_a_click() {
    let mut s = Session::new(GuessGame::with_secret(1), RecordingSurface::new(), NoEcho).unwrap();
    s.start().unwrap();
    assert!(shown(&s).contains("Click to start"));
    s.key_down(&Key::Enter).unwrap();
    assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
}

#[test]
fn typing_echoes_on_the_console_row() {
    let mut s = started(50);
    assert_eq!(s.dispatcher().port(), KeyboardPort::Attached);
    s.key_down(&Key::Char('g')).unwrap();

    let tiles = s.surface().final_tiles(WIDTH, HEIGHT);
    let console: Vec<u8> = tiles[WIDTH * (HEIGHT - 1)..]
        .iter()
        .map(|t| t.unwrap_or(0))
        .collect();
    assert_eq!(&console[..PROMPT.len()], PROMPT);
    assert_eq!(console[PROMPT.len()..PROMPT.len() + 2], [b'g', CURSOR]);
}

#[test]
fn play_to_a_win() {
    let mut s = started(7);
    type_line(&mut s, "guess 3");
    assert!(shown(&s).contains("higher"));
    type_line(&mut s, "7");
    assert_eq!(s.lifecycle(), Lifecycle::Ended);
    assert!(shown(&s).contains("vault door swings open"));

    // The keyboard is gone for good.
    let before = shown(&s);
    type_line(&mut s, "7");
    assert_eq!(shown(&s), before);
}

#[test]
fn quitting_loses() {
    let mut s = started(7);
    type_line(&mut s, "quit");
    assert_eq!(s.lifecycle(), Lifecycle::Ended);
    assert!(shown(&s).contains("the number was 7"));
}
