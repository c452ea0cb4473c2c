use clap::{Parser, Subcommand};
use negamax_core::move_list::MoveList;
use negamax_core::tt::TtTable;
use negamax_core::types::{Depth, Move, ValueType};
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "negamax-core-cli",
    version,
    about = "Sizing/probe/bench harness for the transposition table and move list"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Report the capacity a given hash size resolves to.
    Sizing {
        /// Requested table size in megabytes.
        #[arg(long, default_value_t = 16)]
        mb: i32,
    },
    /// Run a scripted put/probe session against a table and report stats.
    Probe {
        /// Number of put/probe pairs to run.
        #[arg(long, default_value_t = 100_000)]
        puts: u64,
        /// Table size in megabytes.
        #[arg(long, default_value_t = 16)]
        hash_mb: i32,
    },
    /// Time a tight TT probe/put loop and a move list push/pop/sort loop.
    Bench {
        /// Table size in megabytes.
        #[arg(long, default_value_t = 64)]
        mb: i32,
    },
}

/// Minimal xorshift64* generator, in the spirit of the hand-rolled `Rng`
/// chess engines keep around for scripted demos rather than pulling in a
/// full-featured crate for it.
struct Xorshift64(u64);

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Sizing { mb } => cmd_sizing(mb),
        Cmd::Probe { puts, hash_mb } => cmd_probe(puts, hash_mb),
        Cmd::Bench { mb } => cmd_bench(mb),
    }
}

fn cmd_sizing(mb: i32) {
    let tt = TtTable::new(mb);
    println!("{}", tt.string());
}

fn cmd_probe(puts: u64, hash_mb: i32) {
    let mut tt = TtTable::new(hash_mb);
    let mut rng = Xorshift64::new(0x1234_5678_9ABC_DEF0);

    for i in 0..puts {
        let key = rng.next_u64();
        let mv = Move::quiet((key & 0x3F) as u8, ((key >> 6) & 0x3F) as u8);
        let depth = Depth::new((key % 32) as i32);
        tt.put(key, mv, (i % 2000) as i16, depth, ValueType::Exact, false, false);
        tt.probe(key);
    }

    println!("{}", tt.string());
}

fn cmd_bench(mb: i32) {
    const ITERS: u64 = 2_000_000;

    let mut tt = TtTable::new(mb);
    let mut rng = Xorshift64::new(0xC0FF_EE15_F00D_BA11);
    let start = Instant::now();
    for i in 0..ITERS {
        let key = rng.next_u64();
        tt.put(key, Move::quiet(0, 1), 0, Depth::new(4), ValueType::Exact, false, false);
        tt.probe(key);
    }
    let elapsed = start.elapsed();
    let per_sec = ITERS as f64 / elapsed.as_secs_f64();
    println!("tt: {ITERS} probe+put pairs in {elapsed:?} ({per_sec:.0} ops/sec)");

    let mut list = MoveList::new();
    let start = Instant::now();
    for round in 0..ITERS / 64 {
        for i in 0..64u8 {
            list.push_back(Move::quiet(i, i.wrapping_add(1)).set_value(((round + i as u64) % 512) as i16));
        }
        for i in 0..list.len() {
            for j in (i + 1)..list.len() {
                if list.less(j, i) {
                    list.swap(i, j);
                }
            }
        }
        while !list.is_empty() {
            list.pop_back();
        }
    }
    let elapsed = start.elapsed();
    let moves_per_sec = ITERS as f64 / elapsed.as_secs_f64();
    println!("move list: {ITERS} push/sort/pop cycles in {elapsed:?} ({moves_per_sec:.0} moves/sec)");
}
