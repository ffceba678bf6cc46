use polytone::error::GraphError;
use polytone::graph::{
    branch::wet_dry,
    extensions::NodeExt,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
    stack::repeat,
    through::Pipeline,
    util::{ConstantNode, CustomNode, GainNode, LerpNode, PassNode},
};

fn eval(node: &mut dyn GraphNode, inputs: &[f32]) -> Vec<f32> {
    let mut ctx = RenderCtx::new(48_000, 0);
    node.init(&mut ctx);
    let mut out = vec![0.0; node.output_count()];
    node.process(&ctx, inputs, &mut out);
    out
}

fn render(node: &mut dyn GraphNode, ctx: &mut RenderCtx, inputs: &[f32], frames: usize) -> Vec<f32> {
    let mut out = vec![0.0; node.output_count()];
    (0..frames)
        .map(|_| {
            node.process(ctx, inputs, &mut out);
            ctx.tick();
            out[0]
        })
        .collect()
}

#[test]
fn through_feeds_outputs_into_the_next_node() {
    let mut node = ConstantNode::new(vec![1.0, 2.0])
        .through(CustomNode::sum(2))
        .unwrap()
        .scaled(3.0)
        .unwrap();
    assert_eq!(node.input_count(), 0);
    assert_eq!(eval(&mut node, &[]), vec![9.0]);
}

#[test]
fn through_rejects_mismatched_widths() {
    let result = ConstantNode::new(vec![1.0, 2.0]).through(PassNode::new(3));
    assert!(matches!(result, Err(GraphError::ArityMismatch { combinator: "through", .. })));
}

#[test]
fn shared_mix_and_amplify_see_the_same_inputs() {
    let double = || CustomNode::new(1, 1, |i, o| o[0] = i[0] * 2.0);

    let mut sum = PassNode::new(1).mix(double()).unwrap();
    assert_eq!(eval(&mut sum, &[3.0]), vec![9.0]);

    let mut product = PassNode::new(1).amplify(double()).unwrap();
    assert_eq!(eval(&mut product, &[3.0]), vec![18.0]);
}

#[test]
fn split_routing_concatenates_inputs() {
    let mut sum = PassNode::new(1).mix_split(PassNode::new(1)).unwrap();
    assert_eq!(sum.input_count(), 2);
    assert_eq!(eval(&mut sum, &[2.0, 3.0]), vec![5.0]);

    let mut product = PassNode::new(1).amplify_split(PassNode::new(1)).unwrap();
    assert_eq!(eval(&mut product, &[2.0, 3.0]), vec![6.0]);

    assert!(PassNode::new(1).mix_split(PassNode::new(2)).is_err());
}

#[test]
fn beside_and_branch_concatenate_outputs() {
    let mut stack = ConstantNode::value(1.0).beside(PassNode::new(2));
    assert_eq!((stack.input_count(), stack.output_count()), (2, 3));
    assert_eq!(eval(&mut stack, &[5.0, 6.0]), vec![1.0, 5.0, 6.0]);

    let mut branch = PassNode::new(1).branch(GainNode::new(1, 2.0)).unwrap();
    assert_eq!(eval(&mut branch, &[3.0]), vec![3.0, 6.0]);
}

#[test]
fn with_inputs_pins_slots_in_order() {
    let mut lerp = LerpNode::new().with_inputs(&[(2, 0.25)]).unwrap();
    assert_eq!(lerp.input_count(), 2);
    assert_eq!(eval(&mut lerp, &[0.0, 4.0]), vec![1.0]);

    let result = LerpNode::new().with_inputs(&[(3, 1.0)]);
    assert!(matches!(result, Err(GraphError::InvalidInputIndex { index: 3, inputs: 3 })));
}

#[test]
fn repeat_stacks_independent_copies() {
    let mut node = repeat(GainNode::new(1, 2.0).boxed(), 3).unwrap();
    assert_eq!((node.input_count(), node.output_count()), (3, 3));
    assert_eq!(eval(&mut node, &[1.0, 2.0, 3.0]), vec![2.0, 4.0, 6.0]);

    assert!(matches!(repeat(PassNode::new(1).boxed(), 0), Err(GraphError::ZeroRepeat)));
}

#[test]
fn pipeline_checks_every_link() {
    assert!(matches!(Pipeline::new(vec![]), Err(GraphError::EmptyPipeline)));

    let bad = Pipeline::new(vec![ConstantNode::value(1.0).boxed(), PassNode::new(2).boxed()]);
    assert!(matches!(bad, Err(GraphError::ArityMismatch { combinator: "pipeline", .. })));

    let mut good = Pipeline::new(vec![
        ConstantNode::value(1.0).boxed(),
        GainNode::new(1, 0.5).boxed(),
        CustomNode::duplicate(1).boxed(),
    ])
    .unwrap();
    assert_eq!(eval(&mut good, &[]), vec![0.5, 0.5]);
}

#[test]
fn wet_dry_blends_effect_with_input() {
    let square = || CustomNode::new(1, 1, |i, o| o[0] = i[0] * i[0]).boxed();

    assert_eq!(eval(&mut wet_dry(square(), 0.0).unwrap(), &[3.0]), vec![3.0]);
    assert_eq!(eval(&mut wet_dry(square(), 1.0).unwrap(), &[3.0]), vec![9.0]);
    assert_eq!(eval(&mut wet_dry(square(), 0.5).unwrap(), &[3.0]), vec![6.0]);
}

#[test]
fn clone_state_continues_and_clone_fresh_restarts() {
    let mut osc = OscNode::saw().through(GainNode::new(1, 0.5)).unwrap();
    let mut ctx = RenderCtx::new(8_000, 0);
    osc.init(&mut ctx);
    let opening = render(&mut osc, &mut ctx, &[220.0], 100);

    let mut copy = osc.clone_state();
    let mut copy_ctx = ctx.clone();
    let mut fresh = osc.clone_fresh();

    assert_eq!(
        render(&mut osc, &mut ctx, &[220.0], 100),
        render(copy.as_mut(), &mut copy_ctx, &[220.0], 100)
    );

    let mut fresh_ctx = RenderCtx::new(8_000, 0);
    fresh.init(&mut fresh_ctx);
    assert_eq!(render(fresh.as_mut(), &mut fresh_ctx, &[220.0], 100), opening);
}

#[test]
fn reset_returns_a_graph_to_its_start() {
    let mut osc = OscNode::sine().amplify_split(PassNode::new(1)).unwrap();
    let mut ctx = RenderCtx::new(8_000, 0);
    osc.init(&mut ctx);
    let first = render(&mut osc, &mut ctx, &[440.0, 1.0], 50);

    osc.reset();
    let mut ctx = RenderCtx::new(8_000, 0);
    assert_eq!(render(&mut osc, &mut ctx, &[440.0, 1.0], 50), first);
}
