#[macro_use]
mod common;

#[cfg(test)]
mod _return {
    tests! {
        early_return in return is OK
        "1"
    }

    tests! {
        bare_return_yields_nil in return is OK
        "nil"
    }

    tests! {
        return_unwinds_nested_blocks in return is OK
        "found"
    }

    tests! {
        top_level in return is ERR 65
        "[line 1] Error at 'return': Can't return from top-level code."
    }
}
