//! Lives in its own test binary: freezing is process-global and would break
//! lazy registration in unrelated tests.

use sparse_ecs::{component_id_of_registered, freeze_components, register_component};

struct Early;
struct Late;

#[test]
#[should_panic(expected = "component registry frozen")]
fn registration_after_freeze_panics() {
    let early_id = register_component::<Early>();
    freeze_components();

    // Already-registered types keep resolving after the freeze.
    assert_eq!(component_id_of_registered::<Early>(), Some(early_id));
    assert_eq!(component_id_of_registered::<Late>(), None);

    register_component::<Late>();
}
