/// Spread `from` source steps over `to` destination steps.
///
/// Entry `i` is the source advance that belongs to destination step `i`. Row walks apply it
/// before sampling and column walks after. Upscaling yields runs of zeros broken by ones;
/// downscaling yields larger steps offset by half a block, so an advance-first walk samples near
/// block centres. Entries are zeroed once the running total would pass `from - 1`, so a walk
/// over the whole table never leaves the source.
pub fn make_jumps_table(from: i32, to: i32) -> Vec<i32> {
    let len = to.max(0) as usize;
    let mut table = vec![0i32; len];
    if from <= 0 {
        return table;
    }
    if from < to {
        let mut shift = -to;
        for step in table.iter_mut() {
            shift += from;
            if shift > 0 {
                *step = 1;
                shift -= to;
            }
        }
    } else {
        let mut shift = -from / 2;
        for step in table.iter_mut() {
            while shift < 0 {
                *step += 1;
                shift += to;
            }
            shift -= from;
        }
    }

    let mut total = 0;
    for step in table.iter_mut() {
        total += *step;
        if total > from - 1 {
            *step = 0;
        }
    }
    table
}

#[cfg(test)]
#[path = "../../tests/unit/plane/jumps.rs"]
mod tests;
