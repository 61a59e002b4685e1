//! CG demo
//!
//! Builds small sample systems and runs them through the CSR multiply and
//! the Conjugate Gradient solver.
//!
//! Usage:
//!     cargo run --bin cg-demo -- multiply
//!     RUST_LOG=info cargo run --bin cg-demo -- laplacian --size 200 --print-interval 10

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use math_audio_cg::{CgConfig, CsrMatrix, DenseVector, cg_with_guess};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "cg-demo")]
#[command(about = "Sparse matrix-vector products and Conjugate Gradient solves")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multiply the 3x3 sample matrix by [1, 2, 3]
    Multiply,
    /// Solve the 1-D Laplacian system A x = A * ones with CG
    Laplacian {
        /// Number of unknowns
        #[arg(short = 'n', long, default_value = "100")]
        size: usize,

        /// Path to JSON solver configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override relative tolerance
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Override iteration budget
        #[arg(short, long)]
        max_iterations: Option<usize>,

        /// Log progress every N iterations (0 = quiet)
        #[arg(long)]
        print_interval: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Multiply => run_multiply(),
        Command::Laplacian {
            size,
            config,
            tolerance,
            max_iterations,
            print_interval,
        } => {
            let mut cg_config = match config {
                Some(path) => {
                    println!("Loading configuration from: {}", path.display());
                    CgConfig::from_json_file(&path)
                        .with_context(|| format!("reading {}", path.display()))?
                }
                None => CgConfig::default(),
            };
            if let Some(tol) = tolerance {
                cg_config.tolerance = tol;
            }
            if let Some(max_iter) = max_iterations {
                cg_config.max_iterations = max_iter;
            }
            if let Some(interval) = print_interval {
                cg_config.print_interval = interval;
            }
            run_laplacian(size, &cg_config)
        }
    }
}

fn run_multiply() -> Result<()> {
    // A = | 1 0 2 |
    //     | 0 3 0 |
    //     | 4 0 5 |
    let mut a = CsrMatrix::with_capacity(3, 3, 5);
    a.set(0, 0, 1.0)?;
    a.set(0, 2, 2.0)?;
    a.set(1, 1, 3.0)?;
    a.set(2, 0, 4.0)?;
    a.set(2, 2, 5.0)?;

    let x = DenseVector::from_vec(vec![1.0, 2.0, 3.0]);
    let y = a.multiply(&x)?;

    println!("Input vector x:  {:?}", x.as_slice());
    println!("Result vector y: {:?}", y.as_slice());

    if y.as_slice() != [7.0, 6.0, 19.0] {
        bail!("unexpected product {:?}, expected [7, 6, 19]", y.as_slice());
    }
    println!("Matrix-vector product matches the expected [7, 6, 19]");
    Ok(())
}

/// Tridiagonal [-1 2 -1] matrix, SPD for every n
fn laplacian_1d(n: usize) -> Result<CsrMatrix<f64>> {
    let mut a = CsrMatrix::with_capacity(n, n, 3 * n);
    for i in 0..n {
        if i > 0 {
            a.set(i, i - 1, -1.0)?;
        }
        a.set(i, i, 2.0)?;
        if i + 1 < n {
            a.set(i, i + 1, -1.0)?;
        }
    }
    Ok(a)
}

fn run_laplacian(n: usize, config: &CgConfig<f64>) -> Result<()> {
    let a = laplacian_1d(n)?;
    let exact = DenseVector::from_elem(n, 1.0);
    let b = a.multiply(&exact)?;
    let x0 = DenseVector::zeros(n);

    println!(
        "System: {} unknowns, {} nnz, sparsity {:.4}%",
        a.num_rows(),
        a.nnz(),
        a.sparsity() * 100.0
    );
    println!(
        "Solver: max_iterations = {}, tolerance = {:.1e}",
        config.max_iterations, config.tolerance
    );

    let start = Instant::now();
    let solution = cg_with_guess(&a, &b, &x0, config)?;
    let elapsed = start.elapsed();

    let error = solution.x.checked_sub(&exact)?.norm();
    let true_residual = a.multiply(&solution.x)?.checked_sub(&b)?.norm();

    println!("Status:            {:?}", solution.status);
    println!("Iterations:        {}", solution.iterations);
    println!("Relative residual: {:.3e}", solution.relative_residual);
    println!("True residual:     {:.3e}", true_residual);
    println!("Error vs exact:    {:.3e}", error);
    println!("Time:              {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
