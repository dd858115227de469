use hbmgen::driver;
use hbmgen_utils::GenResult;

fn main() -> GenResult<()> {
    driver::run_generator()
}
