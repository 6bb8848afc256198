//! Reads a byte stream from stdin and prints a tally of every message family
//! the parser produced. Kept as the one illustrative binary alongside the
//! library (SPEC_FULL.md §1), updated from the reference parser's
//! `Perform`-counting example to this core's `Handler` trait.

use std::{
    fmt::Display,
    io::{self, Read},
};

use vte_core::{ControlCode, CsiMessage, DcsMessage, EscMessage, Handler, OscMessage, Options, Parser, SgrSequence};

#[derive(Default)]
struct Stat {
    printed: u64,
    control_executed: u64,
    esc_dispatched: u64,
    csi_dispatched: u64,
    sgr_dispatched: u64,
    osc_dispatched: u64,
    dcs_dispatched: u64,
}

impl Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "printed: {}\ncontrol_executed: {}\nesc_dispatched: {}\ncsi_dispatched: {}\nsgr_dispatched: {}\nosc_dispatched: {}\ndcs_dispatched: {}",
            self.printed,
            self.control_executed,
            self.esc_dispatched,
            self.csi_dispatched,
            self.sgr_dispatched,
            self.osc_dispatched,
            self.dcs_dispatched,
        )
    }
}

impl Handler for Stat {
    fn normal_character(&mut self, _code_point: char, _is_utf8_sequence: bool) {
        self.printed += 1;
    }

    fn control_executed(&mut self, _which: ControlCode) {
        self.control_executed += 1;
    }

    fn esc_message(&mut self, _message: EscMessage) {
        self.esc_dispatched += 1;
    }

    fn csi_message(&mut self, _message: CsiMessage) {
        self.csi_dispatched += 1;
    }

    fn sgr_sequence(&mut self, _message: SgrSequence) {
        self.sgr_dispatched += 1;
    }

    fn osc_message(&mut self, _message: OscMessage) {
        self.osc_dispatched += 1;
    }

    fn dcs_message(&mut self, _message: DcsMessage) {
        self.dcs_dispatched += 1;
    }
}

fn main() -> io::Result<()> {
    let input = io::stdin();
    let mut handle = input.lock();

    let mut buf = Vec::new();
    handle.read_to_end(&mut buf)?;

    let mut parser = Parser::new(Options::default());
    let mut stat = Stat::default();

    parser.push_bytes(&mut stat, &buf);

    println!("{stat}");

    Ok(())
}
