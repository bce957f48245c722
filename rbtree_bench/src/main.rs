use clap::{Parser, ValueEnum};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rbtree_arena::{Identity, RedBlackTree, Result};
use std::time::{Duration, Instant};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Order {
    Ascending,
    Descending,
    Random,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Benchmark the arena red black tree.
struct Args {
    #[clap(
        short,
        long,
        help = "Number of keys to insert (default %v)",
        default_value = "100000"
    )]
    keys: u64,

    #[clap(
        short,
        long,
        value_enum,
        help = "Order the keys are inserted in (default %v)",
        default_value = "random"
    )]
    order: Order,

    #[clap(
        short,
        long,
        help = "Seed for the random key order (default %v)",
        default_value = "0"
    )]
    seed: u64,

    #[clap(
        long,
        help = "Insert through the end() hint instead of a full descent"
    )]
    hinted: bool,

    #[clap(
        long,
        help = "Pre-allocate room for every key before inserting"
    )]
    preallocate: bool,

    #[clap(
        short,
        long,
        help = "How many times to run each phase (default %v)",
        default_value = "5"
    )]
    rounds: usize,
}

fn generate_keys(args: &Args) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..args.keys).collect();
    match args.order {
        Order::Ascending => {}
        Order::Descending => keys.reverse(),
        Order::Random => keys.shuffle(&mut StdRng::seed_from_u64(args.seed)),
    }
    keys
}

struct Stats {
    insert: Vec<Duration>,
    find: Vec<Duration>,
    iterate: Vec<Duration>,
    remove: Vec<Duration>,
    reinsert: Vec<Duration>,
}

fn run_round(args: &Args, keys: &[u64], stats: &mut Stats) -> Result<()> {
    let mut tree: RedBlackTree<u64, Identity> = if args.preallocate {
        RedBlackTree::with_capacity(keys.len())
    } else {
        RedBlackTree::new()
    };

    let start_time = Instant::now();
    for key in keys {
        if args.hinted {
            tree.insert_hint(tree.end(), *key)?;
        } else {
            tree.insert(*key)?;
        }
    }
    stats.insert.push(Instant::now().duration_since(start_time));
    if args.hinted {
        info!("Hinted insertion missed {} times", tree.hint_misses());
    }
    tree.check()?;

    let start_time = Instant::now();
    let found = keys.iter().filter(|key| tree.contains(key)).count();
    stats.find.push(Instant::now().duration_since(start_time));
    assert_eq!(found, keys.len());

    let start_time = Instant::now();
    let sum: u64 = tree.iter().sum();
    stats.iterate.push(Instant::now().duration_since(start_time));
    info!("Sum of keys: {}", sum);

    let start_time = Instant::now();
    for key in keys.iter().step_by(2) {
        tree.remove_key(key);
    }
    stats.remove.push(Instant::now().duration_since(start_time));

    // Removed nodes wait in the pool, reinserting must not grow the arena.
    let allocated = tree.allocated();
    let start_time = Instant::now();
    for key in keys.iter().step_by(2) {
        tree.insert(*key)?;
    }
    stats.reinsert.push(Instant::now().duration_since(start_time));
    assert_eq!(tree.allocated(), allocated);
    tree.check()?;

    Ok(())
}

fn print_stats(name: &str, mut stats: Vec<Duration>, keys: u64) {
    stats.sort();

    let total: Duration = stats.iter().sum();
    let last_index = stats.len() - 1;
    let min = stats[0];
    let max = stats[last_index];
    let p50 = stats[last_index / 2];
    let per_key = total / stats.len() as u32 / keys.max(1) as u32;
    println!(
        "{:>8}: total: {:?}, min: {:?}, p50: {:?}, max: {:?}, per key: {:?}",
        name, total, min, p50, max, per_key
    );
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();
    info!("Running with {:?}", args);

    let keys = generate_keys(&args);
    let mut stats = Stats {
        insert: Vec::new(),
        find: Vec::new(),
        iterate: Vec::new(),
        remove: Vec::new(),
        reinsert: Vec::new(),
    };

    for _ in 0..args.rounds.max(1) {
        run_round(&args, &keys, &mut stats)?;
    }

    print_stats("insert", stats.insert, args.keys);
    print_stats("find", stats.find, args.keys);
    print_stats("iterate", stats.iterate, args.keys);
    print_stats("remove", stats.remove, args.keys / 2);
    print_stats("reinsert", stats.reinsert, args.keys / 2);

    Ok(())
}
