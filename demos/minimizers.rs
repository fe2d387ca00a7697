//! Print the (w,k)-minimizer table of a few reads as CSV on stdout.

use std::io;

use kmerstream::{FileProcessor, MemoryParser, MinimizerConsumer, Result};

fn main() -> Result<()> {
    let mut parser = MemoryParser::from_seqs([
        "ACCTAGGGTACGTACGGTTTACCGGTTA",
        "GATTACAGATTACAGATTACA",
    ]);

    let consumer = MinimizerConsumer::with_writer(4, 5, io::stdout().lock())?;
    let mut processor = FileProcessor::new(consumer);
    processor.process(&mut parser)?;
    Ok(())
}
