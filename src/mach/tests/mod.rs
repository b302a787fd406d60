mod stack_test;
