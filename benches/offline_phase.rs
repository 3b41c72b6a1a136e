use divan;
use elliptic_pir::DecryptionTable;
use std::time::Duration;

fn main() {
    divan::main();
}

const MMAX_ARGS: [usize; 2] = [1 << 14, 1 << 16];

#[divan::bench(args = MMAX_ARGS, max_time = Duration::from_secs(100), skip_ext_time = true)]
fn generate_decryption_table(bencher: divan::Bencher, mmax: usize) {
    bencher.bench(|| DecryptionTable::generate(divan::black_box(mmax)));
}

#[divan::bench(args = MMAX_ARGS, max_time = Duration::from_secs(100), skip_ext_time = true)]
fn load_decryption_table(bencher: divan::Bencher, mmax: usize) {
    let table_bytes = DecryptionTable::generate(mmax).unwrap().to_bytes();

    bencher.bench(|| DecryptionTable::from_bytes(divan::black_box(&table_bytes), divan::black_box(mmax)));
}
