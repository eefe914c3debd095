//! Lays out a partition table on a 1 GiB device with 1 MiB alignment.
//!
//! Run with `RUST_LOG=partalign=trace` to see the solver's search.

use partalign::{Alignment, Constraint, Geometry, Range, Sector, Solver, SolverConfig};
use tracing_subscriber::EnvFilter;

/// 512-byte sectors per MiB.
const MIB: Sector = 2048;

struct Request {
    name: &'static str,
    /// Desired size in MiB; `None` takes whatever space is left.
    size_mib: Option<Sector>,
}

fn main() -> partalign::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let device_sectors = 1024 * MIB;
    let device = Constraint::any(device_sectors)?;

    // Partitions start and end on MiB boundaries.
    let mut aligned = device.duplicate();
    aligned.set_start_align(Alignment::new(0, MIB)?)?;
    aligned.set_end_align(Alignment::new(MIB - 1, MIB)?)?;

    let requests = [
        Request {
            name: "efi",
            size_mib: Some(100),
        },
        Request {
            name: "boot",
            size_mib: Some(300),
        },
        Request {
            name: "root",
            size_mib: None,
        },
    ];

    let solver = Solver::new(SolverConfig::default());
    // The first MiB is left to the partition table.
    let mut next_free: Sector = MIB;

    println!("Partition layout on {device_sectors} sectors:");
    println!("==========================================");
    for request in &requests {
        let mut free = aligned.duplicate();
        free.set_start_range(Range::new(next_free, device_sectors - 1)?)?;

        let region = match request.size_mib {
            Some(mib) => {
                let wanted = Geometry::new(next_free, mib * MIB)?;
                solver.solve_nearest(&free, &wanted)?
            }
            None => solver.solve_max(&free)?,
        };
        debug_assert!(free.is_solution(&region));

        println!(
            "{:<6} {} ({} MiB)",
            request.name,
            region,
            region.length() / MIB
        );
        next_free = region.end() + 1;
    }

    // An existing region that already meets the alignment survives intersection unchanged.
    let pinned = Constraint::exact(&Geometry::from_bounds(400 * MIB, device_sectors - 1)?);
    let kept = aligned.intersect(&pinned)?.solve_max()?;
    println!("exact  {kept}");

    Ok(())
}
