struct Parser<'a> {
    src: &'a str, // @TODO borrow bytes instead
}

/* @TODO
   pick a better name
   for this type */
