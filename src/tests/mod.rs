//! End-to-end scenarios across checking, resolution and redraw.

mod card_tests;
