//! Value model tests kept out of the implementation files.
